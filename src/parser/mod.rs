//! Telemetry ingestion.
//!
//! This module handles:
//! - Lazy, restartable reading of newline-delimited JSON records
//! - Flat delimited rows with a fixed positional schema
//! - The record schema and typed field access

pub mod records;
pub mod rows;
pub mod schema;

// Re-export main types
pub use records::{RecordIter, RecordSource};
pub use rows::{read_rows, Row};
pub use schema::Record;
