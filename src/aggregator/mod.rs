//! Aggregation of telemetry records into comparison matrices.
//!
//! This module transforms filtered record streams into:
//! - Structured series/variant keys (declared label projections)
//! - A two-level accumulation store with explicit merge policies
//! - Derived metrics (ratios, per-byte normalization, mean/std)

pub mod derive;
pub mod keys;
pub mod matrix;

// Re-export main types and functions
pub use derive::{derive, mean, per_unit, ratio, std_dev, DeriveOp};
pub use keys::{
    field, prefixed, variant_product, DiffMode, EntryType, KeyField, KeySpec, SeriesKey, VariantKey,
};
pub use matrix::{AccumulatorKind, AggregationMatrix, Cell, Observation};
