use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the findings exporter.
#[derive(Error, Debug)]
pub enum ExporterError {
    /// A source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV export file could not be decoded at all (bad headers,
    /// unreadable stream). Individual malformed rows are skipped and
    /// counted instead of raising this.
    #[error("Failed to parse CSV file {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A JSON export document could not be decoded.
    #[error("Failed to parse JSON file {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configured ingestion root does not exist or cannot be listed.
    #[error("Ingestion root not available: {0}")]
    RootUnavailable(PathBuf),

    /// A discovery glob pattern could not be compiled.
    #[error("Invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The metrics registry rejected a collector or could not be encoded.
    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the exporter crates.
pub type Result<T> = std::result::Result<T, ExporterError>;
