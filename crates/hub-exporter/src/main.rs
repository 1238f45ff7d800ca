mod bootstrap;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use exporter_core::settings::Settings;
use exporter_runtime::metrics::{FindingMetrics, SharedMetrics};
use exporter_runtime::scanner::{spawn_timer, ScanHandle, ScanOutcome, Scanner};
use exporter_runtime::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Security Hub exporter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data dir: {}, bind: {}, scan interval: {}s",
        settings.data_dir.display(),
        settings.bind,
        settings.scan_interval_secs
    );

    let metrics: SharedMetrics = Arc::new(Mutex::new(FindingMetrics::new()?));
    let scanner = ScanHandle::new(Scanner::new(settings.data_dir.clone(), metrics.clone()));

    // One synchronous pass before serving, so the first /metrics read is
    // already populated. A failed pass is logged, not fatal.
    match scanner.trigger().await {
        ScanOutcome::Completed(report) => {
            tracing::info!(
                "Initial scan: {} scanned, {} skipped, {} records failed",
                report.files_scanned,
                report.files_skipped,
                report.records_failed
            );
        }
        ScanOutcome::Failed(e) => tracing::warn!("Initial scan failed: {}", e),
        ScanOutcome::AlreadyRunning => unreachable!("no concurrent scan at startup"),
    }

    let timer = spawn_timer(
        scanner.clone(),
        Duration::from_secs(settings.scan_interval_secs),
    );

    let app = router(AppState { metrics, scanner });
    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    tracing::info!("Serving on {}", listener.local_addr()?);

    tokio::select! {
        result = axum::serve(listener, app) => {
            timer.abort();
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
            timer.abort();
        }
    }

    Ok(())
}
