//! Series and variant key derivation.
//!
//! Keys are structured, ordered tuples of label values compared by value,
//! never string-concatenated composites. Each analysis declares its
//! projection of label fields once; derivation is a pure per-record
//! function of the label set and never consults any other record.

use crate::parser::Record;
use crate::utils::error::{AggregateError, ParseError};
use std::fmt;

/// Ordered tuple of label values identifying the comparison subject
/// (e.g. image name + source version + target version).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesKey(Vec<String>);

/// Ordered tuple of label values identifying one configuration point
/// within a series (e.g. thread count + scheduler + compression + encoding).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantKey(Vec<String>);

impl SeriesKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl VariantKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// The degenerate variant used by analyses that compare series only
    /// (scatter streams have no configuration dimension).
    pub fn unit() -> Self {
        Self(Vec::new())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, parts: &[String]) -> fmt::Result {
    if parts.is_empty() {
        return write!(f, "*");
    }
    write!(f, "{}", parts.join("-"))
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.0)
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.0)
    }
}

/// One projected label field and the short prefix used when the value is
/// shown in a legend or axis label ("" for none).
#[derive(Debug, Clone, Copy)]
pub struct KeyField {
    pub field: &'static str,
    pub prefix: &'static str,
}

/// A bare projection field.
pub const fn field(name: &'static str) -> KeyField {
    KeyField {
        field: name,
        prefix: "",
    }
}

/// A projection field displayed as `prefix-value`.
pub const fn prefixed(prefix: &'static str, name: &'static str) -> KeyField {
    KeyField {
        field: name,
        prefix,
    }
}

/// Declared, ordered projection of named label fields into a key tuple.
#[derive(Debug, Clone)]
pub struct KeySpec {
    fields: Vec<KeyField>,
}

impl KeySpec {
    pub fn new(fields: &[KeyField]) -> Self {
        Self {
            fields: fields.to_vec(),
        }
    }

    fn project(&self, record: &Record) -> Result<Vec<String>, ParseError> {
        self.fields
            .iter()
            .map(|f| record.label(f.field))
            .collect()
    }

    /// Derive the series key for a record.
    pub fn series(&self, record: &Record) -> Result<SeriesKey, ParseError> {
        Ok(SeriesKey(self.project(record)?))
    }

    /// Derive the variant key for a record.
    pub fn variant(&self, record: &Record) -> Result<VariantKey, ParseError> {
        Ok(VariantKey(self.project(record)?))
    }

    fn display(&self, parts: &[String]) -> String {
        parts
            .iter()
            .zip(self.fields.iter())
            .map(|(value, field)| {
                if field.prefix.is_empty() {
                    value.clone()
                } else {
                    format!("{}-{}", field.prefix, value)
                }
            })
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Legend/axis label for a series key, e.g. `nginx-1.23-1.24`.
    pub fn display_series(&self, key: &SeriesKey) -> String {
        self.display(&key.0)
    }

    /// Legend label for a variant key, e.g. `th-8-sched-none-comp-bzip2-enc-bsdiffx`.
    pub fn display_variant(&self, key: &VariantKey) -> String {
        self.display(&key.0)
    }
}

/// Build a declared variant ordering as the cartesian product of axis value
/// lists, last axis varying fastest. The ordering is fixed before ingestion
/// and is independent of which variants actually appear in the data.
pub fn variant_product(axes: &[&[&str]]) -> Vec<VariantKey> {
    let mut keys: Vec<Vec<String>> = vec![Vec::new()];
    for axis in axes {
        let mut next = Vec::with_capacity(keys.len() * axis.len());
        for partial in &keys {
            for value in *axis {
                let mut parts = partial.clone();
                parts.push((*value).to_string());
                next.push(parts);
            }
        }
        keys = next;
    }
    keys.into_iter().map(VariantKey).collect()
}

/// Diff execution mode, classified from the `mode` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    Binary,
    File,
}

impl DiffMode {
    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "binary-diff" => Some(DiffMode::Binary),
            "file-diff" => Some(DiffMode::File),
            _ => None,
        }
    }

    /// Classify a `mode` label value; unknown modes are surfaced, never dropped.
    pub fn classify(value: &str, line: usize) -> Result<Self, AggregateError> {
        Self::from_label(value).ok_or_else(|| AggregateError::UnclassifiedVariant {
            line,
            label: "mode".to_string(),
            value: value.to_string(),
        })
    }
}

/// File entry disposition in a diff, matching the producer's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    New,
    Same,
    Diff,
}

impl EntryType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(EntryType::New),
            1 => Some(EntryType::Same),
            2 => Some(EntryType::Diff),
            _ => None,
        }
    }

    /// Classify a numeric entry-type code; unknown codes are surfaced.
    pub fn classify(code: i64, line: usize) -> Result<Self, AggregateError> {
        Self::from_code(code).ok_or_else(|| AggregateError::UnclassifiedVariant {
            line,
            label: "fileEntryBType".to_string(),
            value: code.to_string(),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::New => "new",
            EntryType::Same => "same",
            EntryType::Diff => "diff",
        }
    }
}
