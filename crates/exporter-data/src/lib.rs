//! Ingestion layer for the Security Hub findings exporter.
//!
//! Responsible for discovering export files under the ingestion root,
//! resolving the owning account from a file's path, parsing CSV and JSON
//! exports into [`exporter_core::models::Finding`] records, and tracking
//! which files have already been processed.

pub mod account;
pub mod discovery;
pub mod normalizer;
pub mod tracker;

pub use exporter_core as core;
