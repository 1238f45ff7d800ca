//! Scan scheduling: discovery, tracker gating, parse and fold.
//!
//! A scan pass walks both export shapes under the ingestion root, parses
//! every new or modified file and folds it into the shared metric state.
//! Exactly one pass runs at a time; a trigger that arrives while a pass is
//! in flight is a no-op, never queued.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use exporter_core::error::{ExporterError, Result};
use exporter_core::models::ScanReport;
use exporter_data::account::account_for_path;
use exporter_data::discovery::{find_csv_exports, find_json_exports};
use exporter_data::normalizer::{parse_csv_file, parse_json_file, ParsedFile};
use exporter_data::tracker::FileTracker;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::metrics::SharedMetrics;

// ── Scanner ───────────────────────────────────────────────────────────────────

/// Which normalizer a discovered file goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportKind {
    Csv,
    Json,
}

/// Drives one scan pass over the ingestion root.
///
/// Owns the [`FileTracker`], so mtime bookkeeping survives across passes
/// for the process lifetime.
pub struct Scanner {
    root: PathBuf,
    /// File name of the ingestion root; the sentinel segment for
    /// path-derived account resolution.
    root_name: String,
    tracker: FileTracker,
    metrics: SharedMetrics,
}

impl Scanner {
    /// Create a scanner over `root` folding into `metrics`.
    pub fn new(root: PathBuf, metrics: SharedMetrics) -> Self {
        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            root,
            root_name,
            tracker: FileTracker::new(),
            metrics,
        }
    }

    /// Run one full scan pass.
    ///
    /// Only a missing ingestion root fails the pass as a whole; any
    /// single file's failure is logged and skipped. The pass duration is
    /// observed into the processing histogram either way.
    pub fn run_scan(&mut self) -> Result<ScanReport> {
        let started = Instant::now();
        let outcome = self.scan_pass();
        self.metrics
            .lock()
            .unwrap()
            .observe_scan_duration(started.elapsed().as_secs_f64());
        outcome
    }

    fn scan_pass(&mut self) -> Result<ScanReport> {
        let csv_files = find_csv_exports(&self.root)?;
        let json_files = find_json_exports(&self.root)?;
        info!(
            "Found {} CSV and {} JSON export files to consider",
            csv_files.len(),
            json_files.len()
        );

        let mut report = ScanReport::default();
        self.process_batch(&csv_files, ExportKind::Csv, &mut report);
        self.process_batch(&json_files, ExportKind::Json, &mut report);

        info!(
            "Scan complete: {} scanned, {} skipped, {} records failed",
            report.files_scanned, report.files_skipped, report.records_failed
        );
        Ok(report)
    }

    fn process_batch(&mut self, files: &[PathBuf], kind: ExportKind, report: &mut ScanReport) {
        for path in files {
            match self.process_file(path, kind) {
                Ok(Some(parsed)) => {
                    report.files_scanned += 1;
                    report.records_failed += parsed.records_failed;
                }
                Ok(None) => report.files_skipped += 1,
                Err(e) => {
                    warn!("Error processing file {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Parse and fold one file, or return `Ok(None)` when its mtime has
    /// not advanced since the last pass.
    fn process_file(&mut self, path: &Path, kind: ExportKind) -> Result<Option<ParsedFile>> {
        let mtime = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|source| ExporterError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;

        if !self.tracker.should_process(path, mtime) {
            debug!("Skipping unchanged file {}", path.display());
            return Ok(None);
        }

        let account = account_for_path(path, &self.root_name);
        info!("Processing {} file: {}", kind_name(kind), path.display());

        let parsed = match kind {
            ExportKind::Csv => parse_csv_file(path, &account)?,
            ExportKind::Json => parse_json_file(path, &account)?,
        };

        // The whole-file fold happens under one lock acquisition, so
        // concurrent readers see either none or all of this file.
        self.metrics
            .lock()
            .unwrap()
            .fold_file(&account, &parsed.findings);

        self.tracker.mark_processed(path, mtime);
        Ok(Some(parsed))
    }
}

fn kind_name(kind: ExportKind) -> &'static str {
    match kind {
        ExportKind::Csv => "CSV",
        ExportKind::Json => "JSON",
    }
}

// ── ScanHandle ────────────────────────────────────────────────────────────────

/// Result of asking the handle for a scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The pass ran to completion.
    Completed(ScanReport),
    /// Another pass was already in flight; nothing was done.
    AlreadyRunning,
    /// The pass failed as a whole (ingestion root unavailable).
    Failed(String),
}

/// Cloneable handle sharing one [`Scanner`] between the timer task and the
/// on-demand trigger endpoint.
#[derive(Clone)]
pub struct ScanHandle {
    inner: std::sync::Arc<Mutex<Scanner>>,
}

impl ScanHandle {
    /// Wrap a scanner for shared triggering.
    pub fn new(scanner: Scanner) -> Self {
        Self {
            inner: std::sync::Arc::new(Mutex::new(scanner)),
        }
    }

    /// Run one scan pass now, unless one is already in flight.
    ///
    /// The in-flight guard is non-blocking: a rejected trigger returns
    /// [`ScanOutcome::AlreadyRunning`] immediately instead of queueing.
    pub async fn trigger(&self) -> ScanOutcome {
        let mut scanner = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                info!("Scan already in progress; trigger ignored");
                return ScanOutcome::AlreadyRunning;
            }
        };

        match scanner.run_scan() {
            Ok(report) => ScanOutcome::Completed(report),
            Err(e) => {
                warn!("Scan pass failed: {}", e);
                ScanOutcome::Failed(e.to_string())
            }
        }
    }
}

// ── Timer task ────────────────────────────────────────────────────────────────

/// A handle to the background scan timer task.
///
/// Drop or call [`ScanTimer::abort`] to stop the loop.
pub struct ScanTimer {
    handle: tokio::task::JoinHandle<()>,
}

impl ScanTimer {
    /// Immediately stop the timer loop.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Spawn the recurring scan task.
///
/// The first interval tick fires immediately and is consumed without a
/// scan; callers run the startup pass themselves before serving traffic.
pub fn spawn_timer(scan: ScanHandle, interval: Duration) -> ScanTimer {
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match scan.trigger().await {
                ScanOutcome::Completed(report) => {
                    debug!(
                        "Timer scan: {} scanned, {} skipped",
                        report.files_scanned, report.files_skipped
                    );
                }
                ScanOutcome::AlreadyRunning => {
                    debug!("Timer scan skipped; a pass is already running");
                }
                ScanOutcome::Failed(e) => {
                    warn!("Timer scan failed (will retry next interval): {}", e);
                }
            }
        }
    });

    ScanTimer { handle }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
