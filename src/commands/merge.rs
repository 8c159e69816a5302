//! Delta merge comparison.
//!
//! Merge time and merged artifact size against the binary diff that
//! produced the inputs, keyed by image and merge output version. Diff
//! records are only accepted for series the merge pass already produced.

use crate::aggregator::{
    field, prefixed, variant_product, AccumulatorKind, AggregationMatrix, DiffMode, KeySpec,
    Observation,
};
use crate::layout::layout;
use crate::output::prepare_output_path;
use crate::parser::RecordSource;
use crate::render::{render_figure, BarPanel, Figure, Panel};
use crate::utils::config::{
    BAR_WIDTH, COMPRESSION_MODES, FIELD_ELAPSED_MS, FIELD_SIZE, LABEL_COMPRESSION,
    LABEL_IMAGE_NAME, LABEL_MODE, LABEL_OUT, LABEL_SCHED_MODE, LABEL_THREAD_NUM,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

/// Arguments for the merge comparison
#[derive(Debug, Clone)]
pub struct MergeArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

fn series_spec() -> KeySpec {
    KeySpec::new(&[field(LABEL_IMAGE_NAME), field(LABEL_OUT)])
}

fn variant_spec() -> KeySpec {
    KeySpec::new(&[
        prefixed("th", LABEL_THREAD_NUM),
        prefixed("sched", LABEL_SCHED_MODE),
        prefixed("comp", LABEL_COMPRESSION),
    ])
}

/// Execute the merge comparison
pub fn execute_merge(args: MergeArgs) -> Result<()> {
    info!(
        "merge comparison: {} -> {}",
        args.input.display(),
        args.output.display()
    );

    let series_spec = series_spec();
    let variant_spec = variant_spec();
    let source = RecordSource::new(&args.input);

    let mut merge_time = AggregationMatrix::new();
    let mut merge_size = AggregationMatrix::new();
    for record in source.records().context("failed to open input")? {
        let record = record?;
        if record.task_name != "merge" {
            continue;
        }
        let series = series_spec.series(&record)?;
        let variant = variant_spec.variant(&record)?;
        merge_time.put(
            series.clone(),
            variant.clone(),
            Observation::Scalar(record.measurement(FIELD_ELAPSED_MS)?),
            AccumulatorKind::Last,
        )?;
        merge_size.put(
            series,
            variant,
            Observation::Scalar(record.measurement(FIELD_SIZE)?),
            AccumulatorKind::Last,
        )?;
    }
    debug!("accumulated {} merge cells", merge_time.cell_count());

    let mut binary_time = AggregationMatrix::new();
    let mut binary_size = AggregationMatrix::new();
    for record in source.records().context("failed to open input")? {
        let record = record?;
        if record.task_name != "diff" {
            continue;
        }
        let mode = DiffMode::classify(&record.label(LABEL_MODE)?, record.line)?;
        if mode != DiffMode::Binary {
            continue;
        }
        let series = series_spec.series(&record)?;
        // only series the merge pass produced belong in this comparison
        if !merge_time.contains_series(&series) {
            continue;
        }
        let variant = variant_spec.variant(&record)?;
        binary_time.put(
            series.clone(),
            variant.clone(),
            Observation::Scalar(record.measurement(FIELD_ELAPSED_MS)?),
            AccumulatorKind::Last,
        )?;
        binary_size.put(
            series,
            variant,
            Observation::Scalar(record.measurement(FIELD_SIZE)?),
            AccumulatorKind::Last,
        )?;
    }

    // merged deltas only exist for the multi-threaded size-ordered scheduler
    let variant_order = variant_product(&[&["8"], &["size-ordered"], COMPRESSION_MODES]);
    let series_order = merge_time.series_order().to_vec();

    let mut panels = Vec::new();
    for (title, y_desc, matrix) in [
        ("merge_time", "Milliseconds", &merge_time),
        ("binary_diff_time", "Milliseconds", &binary_time),
        ("merge_size", "bytes", &merge_size),
        ("binary_diff_size", "bytes", &binary_size),
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
