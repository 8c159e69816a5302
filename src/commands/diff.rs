//! Diff benchmark comparison.
//!
//! Compares binary-diff against file-diff generation across the declared
//! configuration grid, for elapsed time and produced artifact size.

use crate::aggregator::{
    field, prefixed, variant_product, AccumulatorKind, AggregationMatrix, DiffMode, KeySpec,
    Observation,
};
use crate::layout::layout;
use crate::output::prepare_output_path;
use crate::parser::RecordSource;
use crate::render::{render_figure, BarPanel, Figure, Panel};
use crate::utils::config::{
    BAR_WIDTH, COMPRESSION_MODES, DELTA_ENCODINGS, FIELD_ELAPSED_MS, FIELD_SIZE, LABEL_COMPRESSION,
    LABEL_ENCODING, LABEL_IMAGE_NAME, LABEL_MODE, LABEL_NEW, LABEL_OLD, LABEL_SCHED_MODE,
    LABEL_THREAD_NUM, SCHED_MODES, THREAD_COUNTS,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

/// Arguments for the diff comparison
#[derive(Debug, Clone)]
pub struct DiffArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

fn series_spec() -> KeySpec {
    KeySpec::new(&[
        field(LABEL_IMAGE_NAME),
        field(LABEL_OLD),
        field(LABEL_NEW),
    ])
}

fn variant_spec() -> KeySpec {
    KeySpec::new(&[
        prefixed("th", LABEL_THREAD_NUM),
        prefixed("sched", LABEL_SCHED_MODE),
        prefixed("comp", LABEL_COMPRESSION),
        prefixed("enc", LABEL_ENCODING),
    ])
}

/// Execute the diff comparison
///
/// # Errors
/// * Malformed input or missing labels
/// * An unclassified `mode` value
/// * A declared configuration missing from the data at layout time
pub fn execute_diff(args: DiffArgs) -> Result<()> {
    info!(
        "diff comparison: {} -> {}",
        args.input.display(),
        args.output.display()
    );

    let series_spec = series_spec();
    let variant_spec = variant_spec();

    let mut binary_time = AggregationMatrix::new();
    let mut binary_size = AggregationMatrix::new();
    let mut file_time = AggregationMatrix::new();
    let mut file_size = AggregationMatrix::new();

    let source = RecordSource::new(&args.input);
    let mut accepted = 0usize;
    for record in source.records().context("failed to open input")? {
        let record = record?;
        if record.task_name != "diff" {
            continue;
        }
        let mode = DiffMode::classify(&record.label(LABEL_MODE)?, record.line)?;
        let series = series_spec.series(&record)?;
        let variant = variant_spec.variant(&record)?;
        let elapsed = record.measurement(FIELD_ELAPSED_MS)?;
        let size = record.measurement(FIELD_SIZE)?;

        let (time, artifact) = match mode {
            DiffMode::Binary => (&mut binary_time, &mut binary_size),
            DiffMode::File => (&mut file_time, &mut file_size),
        };
        time.put(
            series.clone(),
            variant.clone(),
            Observation::Scalar(elapsed),
            AccumulatorKind::Last,
        )?;
        artifact.put(series, variant, Observation::Scalar(size), AccumulatorKind::Last)?;
        accepted += 1;
    }
    debug!("accepted {} diff records", accepted);

    // declared configuration ordering, independent of the data
    let variant_order = variant_product(&[
        THREAD_COUNTS,
        SCHED_MODES,
        COMPRESSION_MODES,
        DELTA_ENCODINGS,
    ]);
    // every panel shares the binary-diff series axis
    let series_order = binary_time.series_order().to_vec();

    let mut panels = Vec::new();
    for (title, y_desc, matrix) in [
        ("binary_diff_time", "Milliseconds", &binary_time),
        ("file_diff_time", "Milliseconds", &file_time),
        ("binary_diff_size", "bytes", &binary_size),
        ("file_diff_size", "bytes", &file_size),
    ] {
        let mut plan = layout(matrix, &series_order, &variant_order, BAR_WIDTH)?;
        plan.variant_labels = variant_order
            .iter()
            .map(|v| variant_spec.display_variant(v))
            .collect();
        panels.push(Panel::Bars(BarPanel {
            title: title.to_string(),
            y_desc: y_desc.to_string(),
            plan,
        }));
    }

    prepare_output_path(&args.output)?;
    render_figure(&Figure::column(panels), &args.output).context("failed to render figure")?;
    Ok(())
}
