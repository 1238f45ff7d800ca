//! Modification-time bookkeeping for already-processed export files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Tracks which export files have been folded into the metrics and when.
///
/// A file is due for (re)processing iff it has never been seen or its
/// on-disk modification time is strictly newer than the one recorded at
/// the last successful pass.
///
/// Entries are never evicted: a file deleted from disk simply stops
/// appearing in discovery and its entry becomes inert. Growth is bounded
/// by the number of distinct export paths seen over the process lifetime.
#[derive(Debug, Default)]
pub struct FileTracker {
    seen: HashMap<PathBuf, SystemTime>,
}

impl FileTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` needs processing given its current modification time.
    pub fn should_process(&self, path: &Path, mtime: SystemTime) -> bool {
        match self.seen.get(path) {
            Some(stored) => mtime > *stored,
            None => true,
        }
    }

    /// Record a successful processing pass for `path`.
    pub fn mark_processed(&mut self, path: &Path, mtime: SystemTime) {
        self.seen.insert(path.to_path_buf(), mtime);
    }

    /// Number of paths ever tracked.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no path has been tracked yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
