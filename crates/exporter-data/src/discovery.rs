//! Export file discovery under the ingestion root.
//!
//! Security Hub exports land in two shapes below the root directory:
//! `<root>/<account>/csv/findings-*.csv` and
//! `<root>/<account>/findings-*.json`. The two patterns are enumerated
//! independently and cannot match the same file.

use std::path::{Path, PathBuf};

use exporter_core::error::{ExporterError, Result};
use tracing::warn;

/// Glob suffix for CSV exports relative to the ingestion root.
const CSV_SHAPE: &str = "*/csv/findings-*.csv";

/// Glob suffix for JSON exports relative to the ingestion root.
const JSON_SHAPE: &str = "*/findings-*.json";

/// Find all CSV export files under `root`, sorted by path.
pub fn find_csv_exports(root: &Path) -> Result<Vec<PathBuf>> {
    find_exports(root, CSV_SHAPE)
}

/// Find all JSON export files under `root`, sorted by path.
pub fn find_json_exports(root: &Path) -> Result<Vec<PathBuf>> {
    find_exports(root, JSON_SHAPE)
}

/// Enumerate files matching `shape` below `root`.
///
/// Fails with [`ExporterError::RootUnavailable`] when the root itself is
/// missing; unreadable directory entries below it are logged and skipped.
fn find_exports(root: &Path, shape: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ExporterError::RootUnavailable(root.to_path_buf()));
    }

    let pattern = root.join(shape);
    let pattern = pattern.to_string_lossy();

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!("Unreadable entry while scanning {}: {}", pattern, e);
            }
        }
    }

    files.sort();
    Ok(files)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
