//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! There is no local recovery anywhere: every error aborts the current
//! analysis invocation. Either the full comparison matrix is consistent,
//! or no artifact is produced.

use thiserror::Error;

/// Errors that can occur while reading telemetry input
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record at line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("failed to read delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error("record at line {line} is missing label \"{name}\"")]
    MissingLabel { line: usize, name: String },

    #[error("record at line {line} is missing field \"{name}\"")]
    MissingField { line: usize, name: String },
}

/// Errors that can occur during accumulation and metric derivation
#[derive(Error, Debug)]
pub enum AggregateError {
    /// A label value the analysis does not know how to classify.
    /// Classification gaps are analyst-visible failures, never tolerated noise.
    #[error("record at line {line} has unclassified {label} value \"{value}\"")]
    UnclassifiedVariant {
        line: usize,
        label: String,
        value: String,
    },

    #[error("no cell accumulated for series {series}, variant {variant}")]
    MissingCell { series: String, variant: String },

    #[error("zero denominator while deriving {context}")]
    DivisionByZero { context: String },

    #[error("cell holds a {found} accumulator, expected {expected}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors that can occur while computing the comparison layout
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A variant declared in the comparison ordering was never observed
    /// for some series. Never substituted with a silent zero-fill.
    #[error("variant {variant} declared for comparison but never observed for series {series}")]
    MissingVariant { series: String, variant: String },

    #[error(transparent)]
    Value(#[from] AggregateError),
}

/// Errors that can occur during chart rendering
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("nothing to draw: figure has no panels")]
    EmptyFigure,

    #[error("chart backend error: {0}")]
    Backend(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("failed to write row: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("row {line} has unrecognized task type \"{value}\"")]
    UnrecognizedTaskType { line: usize, value: String },

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}
