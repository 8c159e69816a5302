//! Image pull comparison.
//!
//! Total pull time and the download portion alone, each split into
//! binary-diff and file-diff delta modes. The record source is restartable,
//! so the two tasks are ingested in separate passes over the same input.

use crate::aggregator::{
    field, prefixed, variant_product, AccumulatorKind, AggregationMatrix, DiffMode, KeySpec,
    Observation,
};
use crate::layout::layout;
use crate::output::prepare_output_path;
use crate::parser::RecordSource;
use crate::render::{render_figure, BarPanel, Figure, Panel};
use crate::utils::config::{
    BAR_WIDTH, COMPRESSION_MODES, DELTA_ENCODINGS, FIELD_ELAPSED_MS, LABEL_COMPRESSION,
    LABEL_ENCODING, LABEL_IMAGE_NAME, LABEL_MODE, LABEL_NEW, LABEL_OLD, LABEL_SCHED_MODE,
    LABEL_THREAD_NUM, SCHED_MODES, THREAD_COUNTS,
};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the pull comparison
#[derive(Debug, Clone)]
pub struct PullArgs {
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

/// One ingestion pass for a single task, split by diff mode.
fn ingest_task(
    source: &RecordSource,
    task: &str,
) -> Result<(AggregationMatrix, AggregationMatrix)> {
    let series_spec = series_spec();
    let variant_spec = variant_spec();
    let mut binary = AggregationMatrix::new();
    let mut file = AggregationMatrix::new();

    for record in source.records().context("failed to open input")? {
        let record = record?;
        if record.task_name != task {
            continue;
        }
        let mode = DiffMode::classify(&record.label(LABEL_MODE)?, record.line)?;
        let series = series_spec.series(&record)?;
        let variant = variant_spec.variant(&record)?;
        let elapsed = record.measurement(FIELD_ELAPSED_MS)?;
        let matrix = match mode {
            DiffMode::Binary => &mut binary,
            DiffMode::File => &mut file,
        };
        matrix.put(
            series,
            variant,
            Observation::Scalar(elapsed),
            AccumulatorKind::Last,
        )?;
    }
    Ok((binary, file))
}

/// Execute the pull comparison
pub fn execute_pull(args: PullArgs) -> Result<()> {
    info!(
        "pull comparison: {} -> {}",
        args.input.display(),
        args.output.display()
    );

    let source = RecordSource::new(&args.input);
    let (binary_pull, file_pull) = ingest_task(&source, "pull")?;
    let (binary_download, file_download) = ingest_task(&source, "pull-download")?;

    let variant_spec = variant_spec();
    let variant_order = variant_product(&[
        THREAD_COUNTS,
        SCHED_MODES,
        COMPRESSION_MODES,
        DELTA_ENCODINGS,
    ]);
    let series_order = binary_pull.series_order().to_vec();

    let mut panels = Vec::new();
    for (title, matrix) in [
        ("binary_pull_time", &binary_pull),
        ("file_pull_time", &file_pull),
        ("binary_download_time", &binary_download),
        ("file_download_time", &file_download),
    ] {
        let mut plan = layout(matrix, &series_order, &variant_order, BAR_WIDTH)?;
        plan.variant_labels = variant_order
            .iter()
            .map(|v| variant_spec.display_variant(v))
            .collect();
        panels.push(Panel::Bars(BarPanel {
            title: title.to_string(),
            y_desc: "Milliseconds".to_string(),
            plan,
        }));
    }

    prepare_output_path(&args.output)?;
    render_figure(&Figure::column(panels), &args.output).context("failed to render figure")?;
    Ok(())
}
