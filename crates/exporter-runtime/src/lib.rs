//! Runtime layer for the Security Hub findings exporter.
//!
//! Owns the aggregate metric state, drives periodic and on-demand scan
//! passes over the ingestion root and serves the HTTP surface
//! (`/metrics`, `/health`, `/process`).

pub mod metrics;
pub mod scanner;
pub mod server;
