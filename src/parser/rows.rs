//! Flat-row telemetry reader.
//!
//! Fixed positional schema: `[subject, taskType, ...task-specific fields...]`.
//! Used by the log-splitting and tag-averaging variants.

use crate::utils::error::ParseError;
use std::path::Path;

/// One delimited row with its 1-based line number.
#[derive(Debug, Clone)]
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

impl Row {
    /// Positional field access; short rows are malformed input.
    pub fn get(&self, idx: usize) -> Result<&str, ParseError> {
        self.fields
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| ParseError::MalformedRow {
                line: self.line,
                reason: format!(
                    "expected at least {} fields, found {}",
                    idx + 1,
                    self.fields.len()
                ),
            })
    }

    /// Positional field parsed as a number.
    pub fn number(&self, idx: usize) -> Result<f64, ParseError> {
        let raw = self.get(idx)?;
        raw.trim()
            .parse::<f64>()
            .map_err(|e| ParseError::MalformedRow {
                line: self.line,
                reason: format!("field {} is not numeric (\"{}\"): {}", idx, raw, e),
            })
    }
}

/// Read every row of a delimited log.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<Row>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ParseError::MalformedRow {
            line: idx + 1,
            reason: e.to_string(),
        })?;
        rows.push(Row {
            line: idx + 1,
            fields: record.iter().map(str::to_string).collect(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_field_access() {
        let row = Row {
            line: 3,
            fields: vec!["nginx".into(), "pull".into(), "120".into()],
        };
        assert_eq!(row.get(1).unwrap(), "pull");
        assert_eq!(row.number(2).unwrap(), 120.0);
        assert!(matches!(
            row.get(5),
            Err(ParseError::MalformedRow { line: 3, .. })
        ));
    }

    #[test]
    fn test_non_numeric_field() {
        let row = Row {
            line: 1,
            fields: vec!["x".into()],
        };
        assert!(row.number(0).is_err());
    }
}
