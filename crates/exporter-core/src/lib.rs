//! Core types for the Security Hub findings exporter.
//!
//! Holds the canonical [`models::Finding`] record, the error taxonomy and
//! the CLI settings shared by the ingestion and runtime crates.

pub mod error;
pub mod models;
pub mod settings;
