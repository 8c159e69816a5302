//! Newline-delimited record source.
//!
//! Produces a lazy, finite sequence of parsed records. Restartable: every
//! call to [`RecordSource::records`] re-opens the input and reads from the
//! start; no cursor state is shared between passes.
//!
//! An unparseable line is fatal. No partial or garbage aggregation.

use super::schema::Record;
use crate::utils::error::ParseError;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Handle to a newline-delimited telemetry log.
pub struct RecordSource {
    path: PathBuf,
}

impl RecordSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Start a fresh pass over the input.
    pub fn records(&self) -> Result<RecordIter, ParseError> {
        debug!("opening record stream: {}", self.path.display());
        let file = File::open(&self.path)?;
        Ok(RecordIter {
            lines: BufReader::new(file).lines(),
            line: 0,
        })
    }
}

/// Lazy iterator over the records of one pass.
pub struct RecordIter {
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl Iterator for RecordIter {
    type Item = Result<Record, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(ParseError::Io(e))),
            };
            self.line += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(match serde_json::from_str::<Record>(&line) {
                Ok(mut record) => {
                    record.line = self.line;
                    Ok(record)
                }
                Err(source) => Err(ParseError::MalformedRecord {
                    line: self.line,
                    source,
                }),
            });
        }
    }
}
