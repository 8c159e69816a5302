//! Per-file compression efficiency comparison.
//!
//! For every changed file, relates the binary-diff compressed size to the
//! file-diff compressed size as an efficiency ratio, scattered against the
//! file's size. Zero-sized entries stand for unchanged files and are
//! excluded before the ratio is derived.

use crate::aggregator::{
    field, ratio, AccumulatorKind, AggregationMatrix, KeySpec, Observation, VariantKey,
};
use crate::output::prepare_output_path;
use crate::parser::RecordSource;
use crate::render::{render_figure, Figure, Panel, ScatterPanel};
use crate::utils::config::{
    FIELD_BINARY_DIFF_SIZE, FIELD_FILE_DIFF_SIZE, FIELD_FILE_SIZE, LABEL_IMAGE_NAME, LABEL_NEW,
    LABEL_OLD,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

/// Arguments for the per-file efficiency comparison
#[derive(Debug, Clone)]
pub struct FileCompareArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Execute the per-file efficiency comparison
pub fn execute_file_compare(args: FileCompareArgs) -> Result<()> {
    info!(
        "file efficiency comparison: {} -> {}",
        args.input.display(),
        args.output.display()
    );

    let series_spec = KeySpec::new(&[
        field(LABEL_IMAGE_NAME),
        field(LABEL_OLD),
        field(LABEL_NEW),
    ]);

    let mut compare = AggregationMatrix::new();
    let mut skipped = 0usize;
    let source = RecordSource::new(&args.input);
    for record in source.records().context("failed to open input")? {
        let record = record?;
        let file_size = record.measurement(FIELD_FILE_SIZE)?;
        let file_diff_size = record.measurement(FIELD_FILE_DIFF_SIZE)?;
        let binary_diff_size = record.measurement(FIELD_BINARY_DIFF_SIZE)?;

        // unchanged files report zero sizes and carry no signal
        if file_size == 0.0 || file_diff_size == 0.0 || binary_diff_size == 0.0 {
            skipped += 1;
            continue;
        }

        let efficiency = ratio(binary_diff_size, file_diff_size)?;
        let series = series_spec.series(&record)?;
        compare.put(
            series,
            VariantKey::unit(),
            Observation::Point {
                x: file_size,
                y: efficiency,
            },
            AccumulatorKind::Series,
        )?;
    }
    debug!(
        "{} series, {} zero-size entries skipped",
        compare.series_order().len(),
        skipped
    );

    let mut groups = Vec::new();
    for series in compare.series_order() {
        let cell = compare.cell(series, &VariantKey::unit())?;
        groups.push((series.to_string(), cell.points()?.to_vec()));
    }

    let figure = Figure::column(vec![Panel::Scatter(ScatterPanel {
        title: "Compare".to_string(),
        x_desc: "File size (bytes)".to_string(),
        y_desc: "Efficiency".to_string(),
        groups,
    })]);

    prepare_output_path(&args.output)?;
    render_figure(&figure, &args.output).context("failed to render figure")?;
    Ok(())
}
