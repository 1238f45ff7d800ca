//! HTTP surface: metrics exposition, health check and manual trigger.
//!
//! Every handler reports its outcome in the response body; none of them
//! surface a scan failure as an HTTP error. The exposition endpoint always
//! returns a well-formed snapshot, even when the most recent scan failed.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::metrics::SharedMetrics;
use crate::scanner::{ScanHandle, ScanOutcome};

// ── AppState ──────────────────────────────────────────────────────────────────

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub metrics: SharedMetrics,
    pub scanner: ScanHandle,
}

/// Build the exporter's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .route("/process", get(process))
        .with_state(state)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Prometheus exposition of the current aggregate state.
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = match state.metrics.lock().unwrap().render() {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to render metrics snapshot: {}", e);
            String::new()
        }
    };
    ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body)
}

/// Liveness probe; carries no aggregate-state dependency.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Synchronously run one scan pass and report what happened.
async fn process(State(state): State<AppState>) -> Json<serde_json::Value> {
    let timestamp = Utc::now().to_rfc3339();
    let body = match state.scanner.trigger().await {
        ScanOutcome::Completed(report) => json!({
            "status": "processed",
            "timestamp": timestamp,
            "files_scanned": report.files_scanned,
            "files_skipped": report.files_skipped,
            "records_failed": report.records_failed,
        }),
        ScanOutcome::AlreadyRunning => json!({
            "status": "scan_in_progress",
            "timestamp": timestamp,
        }),
        ScanOutcome::Failed(error) => json!({
            "status": "failed",
            "timestamp": timestamp,
            "error": error,
        }),
    };
    Json(body)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
