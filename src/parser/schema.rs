//! Telemetry record schema.
//!
//! The benchmark producer emits one JSON record per line:
//! `{"taskName": string, "labels": {string: string|number}, <measurements>: number}`.
//! Measurement field names vary by task; each analysis declares exactly
//! which fields it consumes.

use crate::utils::error::ParseError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// One telemetry event. Immutable once read.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    /// Identifier of the operation measured (e.g. "diff", "pull", "open")
    #[serde(rename = "taskName")]
    pub task_name: String,

    /// Categorical labels attached to the event
    #[serde(default)]
    labels: HashMap<String, Value>,

    /// Task-specific measurement fields (elapsedMilliseconds, size, ...)
    #[serde(flatten)]
    fields: HashMap<String, Value>,

    /// 1-based input line number, kept for error context
    #[serde(skip)]
    pub line: usize,
}

impl Record {
    /// Look up a label, tolerating numeric-as-string values.
    pub fn label_opt(&self, name: &str) -> Option<String> {
        match self.labels.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Look up a label the analysis requires.
    pub fn label(&self, name: &str) -> Result<String, ParseError> {
        self.label_opt(name).ok_or_else(|| ParseError::MissingLabel {
            line: self.line,
            name: name.to_string(),
        })
    }

    /// Look up a required numeric measurement field.
    pub fn measurement(&self, name: &str) -> Result<f64, ParseError> {
        self.fields
            .get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| ParseError::MissingField {
                line: self.line,
                name: name.to_string(),
            })
    }

    /// Look up a required textual field outside the label set (e.g. "path").
    pub fn text(&self, name: &str) -> Result<&str, ParseError> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::MissingField {
                line: self.line,
                name: name.to_string(),
            })
    }

    #[cfg(test)]
    pub fn from_json(line: usize, json: &str) -> Record {
        let mut record: Record = serde_json::from_str(json).unwrap();
        record.line = line;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"taskName":"diff","labels":{"mode":"binary-diff","threadNum":8},"elapsedMilliseconds":120,"size":4096,"path":"/etc/hosts"}"#;

    #[test]
    fn test_label_lookup() {
        let record = Record::from_json(1, SAMPLE);
        assert_eq!(record.label("mode").unwrap(), "binary-diff");
        // numeric label values surface as strings
        assert_eq!(record.label("threadNum").unwrap(), "8");
    }

    #[test]
    fn test_missing_label_is_error() {
        let record = Record::from_json(7, SAMPLE);
        let err = record.label("compressionMode").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingLabel { line: 7, ref name } if name == "compressionMode"
        ));
    }

    #[test]
    fn test_measurement_lookup() {
        let record = Record::from_json(1, SAMPLE);
        assert_eq!(record.measurement("elapsedMilliseconds").unwrap(), 120.0);
        assert_eq!(record.measurement("size").unwrap(), 4096.0);
        assert!(record.measurement("fileSize").is_err());
    }

    #[test]
    fn test_text_field() {
        let record = Record::from_json(1, SAMPLE);
        assert_eq!(record.text("path").unwrap(), "/etc/hosts");
    }
}
