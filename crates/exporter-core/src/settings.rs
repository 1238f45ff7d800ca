use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Prometheus exporter for AWS Security Hub finding exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hub-exporter",
    about = "Prometheus exporter for AWS Security Hub finding exports",
    version
)]
pub struct Settings {
    /// Ingestion root holding per-account export directories
    #[arg(long, env = "EXPORTER_DATA_DIR", default_value = "/output")]
    pub data_dir: PathBuf,

    /// Address the HTTP endpoints bind to
    #[arg(long, env = "EXPORTER_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Seconds between background scan passes (1-3600)
    #[arg(long, default_value = "300", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub scan_interval_secs: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
