//! Patch application vs di3fs mount comparison.
//!
//! Both tasks restore the same target image; the task name becomes the
//! leading variant field so the two strategies sit side by side.

use crate::aggregator::{
    field, variant_product, AccumulatorKind, AggregationMatrix, KeySpec, Observation, VariantKey,
};
use crate::layout::layout;
use crate::output::prepare_output_path;
use crate::parser::RecordSource;
use crate::render::{render_figure, BarPanel, Figure, Panel};
use crate::utils::config::{
    BAR_WIDTH, COMPRESSION_MODES, DELTA_ENCODINGS, FIELD_ELAPSED_MS, LABEL_COMPRESSION,
    LABEL_ENCODING, LABEL_IMAGE_NAME, LABEL_NEW, LABEL_OLD,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

const MOUNT_TASKS: &[&str] = &["patch", "di3fs"];

/// Arguments for the patch/mount comparison
#[derive(Debug, Clone)]
pub struct PatchArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

fn variant_label(key: &VariantKey) -> String {
    let parts = key.parts();
    format!("{}-comp-{}-enc-{}", parts[0], parts[1], parts[2])
}

/// Execute the patch/mount comparison
pub fn execute_patch(args: PatchArgs) -> Result<()> {
    info!(
        "patch comparison: {} -> {}",
        args.input.display(),
        args.output.display()
    );

    let series_spec = KeySpec::new(&[
        field(LABEL_IMAGE_NAME),
        field(LABEL_OLD),
        field(LABEL_NEW),
    ]);

    let mut mount_time = AggregationMatrix::new();
    let source = RecordSource::new(&args.input);
    for record in source.records().context("failed to open input")? {
        let record = record?;
        if !MOUNT_TASKS.contains(&record.task_name.as_str()) {
            continue;
        }
        let series = series_spec.series(&record)?;
        let variant = VariantKey::new([
            record.task_name.clone(),
            record.label(LABEL_COMPRESSION)?,
            record.label(LABEL_ENCODING)?,
        ]);
        let elapsed = record.measurement(FIELD_ELAPSED_MS)?;
        mount_time.put(
            series,
            variant,
            Observation::Scalar(elapsed),
            AccumulatorKind::Last,
        )?;
    }
    debug!("accumulated {} mount cells", mount_time.cell_count());

    let variant_order = variant_product(&[MOUNT_TASKS, COMPRESSION_MODES, DELTA_ENCODINGS]);
    let series_order = mount_time.series_order().to_vec();

    let mut plan = layout(&mount_time, &series_order, &variant_order, BAR_WIDTH)?;
    plan.variant_labels = variant_order.iter().map(variant_label).collect();

    let figure = Figure::column(vec![Panel::Bars(BarPanel {
        title: "mount_time".to_string(),
        y_desc: "Milliseconds".to_string(),
        plan,
    })]);

    prepare_output_path(&args.output)?;
    render_figure(&figure, &args.output).context("failed to render figure")?;
    Ok(())
}
