//! Flat benchmark log splitter.
//!
//! Reorganizes a combined delimited log into one file per task bucket.
//! Diff rows are split further by their mode column. An unrecognized task
//! type aborts the run; rows are never dropped silently.

use crate::output::BucketWriter;
use crate::parser::{read_rows, Row};
use crate::utils::error::{AggregateError, OutputError};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Column holding the diff mode in diff rows
const MODE_COLUMN: usize = 6;

/// Arguments for the log splitter
#[derive(Debug, Clone)]
pub struct SplitArgs {
    pub input: PathBuf,
    pub out_dir: PathBuf,
}

fn bucket_for(row: &Row) -> Result<&'static str> {
    let bucket = match row.get(1)? {
        "diff" => match row.get(MODE_COLUMN)? {
            "binary-diff" => "diff_binary",
            "file-diff" => "diff_file",
            other => {
                return Err(AggregateError::UnclassifiedVariant {
                    line: row.line,
                    label: "mode".to_string(),
                    value: other.to_string(),
                }
                .into())
            }
        },
        "patch" => "patch",
        "di3fs" => "di3fs",
        "merge" => "merge",
        "pull" => "pull",
        "pull-download" => "pull_download",
        other => {
            return Err(OutputError::UnrecognizedTaskType {
                line: row.line,
                value: other.to_string(),
            }
            .into())
        }
    };
    Ok(bucket)
}

/// Execute the log splitter
pub fn execute_split(args: SplitArgs) -> Result<()> {
    info!(
        "splitting {} into {}",
        args.input.display(),
        args.out_dir.display()
    );

    let rows = read_rows(&args.input).context("failed to read input")?;
    let mut buckets = BucketWriter::create(&args.out_dir)?;

    for row in &rows {
        let bucket = bucket_for(row)?;
        buckets.write(bucket, row)?;
    }

    buckets.finish()?;
    info!("split {} rows", rows.len());
    Ok(())
}
