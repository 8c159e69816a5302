//! Delta Bench Studio
//!
//! Comparative benchmark charts and summary tables for container-image
//! delta tooling.
//!
//! This crate post-processes the telemetry log emitted by the delta
//! benchmark harness (newline-delimited JSON records or flat delimited
//! rows) and renders grouped-bar and scatter comparisons across
//! configurations and image version pairs.
//!
//! ## Getting Started
//!
//! Most users should use the CLI:
//!
//! ```bash
//! delta-bench diff bench.log diff.png
//! delta-bench --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod layout;
pub mod output;
pub mod parser;
pub mod render;
pub mod utils;
