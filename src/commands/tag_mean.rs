//! Tag-average reducer.
//!
//! Collapses a flat benchmark log to one line per tag (subject, task and
//! configuration columns) with the mean of the measured column, printed as
//! `tag,mean` rows.

use crate::aggregator::{AccumulatorKind, AggregationMatrix, Observation, SeriesKey, VariantKey};
use crate::parser::{read_rows, Row};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Columns composing the tag
const TAG_COLUMNS: &[usize] = &[0, 1, 4, 5, 6];

/// Column holding the measured value
const VALUE_COLUMN: usize = 3;

/// Arguments for the tag-average reducer
#[derive(Debug, Clone)]
pub struct TagMeanArgs {
    pub input: PathBuf,
}

/// Reduce rows to (tag, mean) pairs in first-appearance order.
pub fn reduce(rows: &[Row]) -> Result<Vec<(String, f64)>> {
    let mut matrix = AggregationMatrix::new();
    for row in rows {
        let tag = SeriesKey::new(
            TAG_COLUMNS
                .iter()
                .map(|&idx| row.get(idx).map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?,
        );
        matrix.put(
            tag,
            VariantKey::unit(),
            Observation::Scalar(row.number(VALUE_COLUMN)?),
            AccumulatorKind::CountSum,
        )?;
    }

    let mut out = Vec::with_capacity(matrix.series_order().len());
    for tag in matrix.series_order() {
        let cell = matrix.cell(tag, &VariantKey::unit())?;
        out.push((tag.parts().join(","), cell.mean()?));
    }
    Ok(out)
}

/// Execute the tag-average reducer
pub fn execute_tag_mean(args: TagMeanArgs) -> Result<()> {
    info!("tag averages for {}", args.input.display());

    let rows = read_rows(&args.input).context("failed to read input")?;
    for (tag, mean) in reduce(&rows)? {
        println!("{},{}", tag, mean);
    }
    Ok(())
}
