//! Per-file diff and merge cost comparison.
//!
//! Scatters per-file diff time and compressed size against file size,
//! grouped by entry type and compression mode, alongside per-file merge
//! times grouped by merge mode. Plain copy merges carry no delta work and
//! are filtered out.

use crate::aggregator::{
    AccumulatorKind, AggregationMatrix, Observation, SeriesKey, VariantKey,
};
use crate::output::prepare_output_path;
use crate::parser::RecordSource;
use crate::render::{render_figure, Figure, Panel, ScatterPanel};
use crate::utils::config::{
    FIELD_ELAPSED_MS, FIELD_SIZE, LABEL_COMPRESSED_SIZE, LABEL_COMPRESSION, LABEL_MERGE_MODE,
    LABEL_OBJ, LABEL_TYPE,
};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the per-file diff comparison
#[derive(Debug, Clone)]
pub struct FileDiffArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

fn type_label(key: &SeriesKey) -> String {
    let parts = key.parts();
    format!("type-{}-comp-{}", parts[0], parts[1])
}

fn mode_label(key: &SeriesKey) -> String {
    let parts = key.parts();
    format!("mode-{}-comp-{}", parts[0], parts[1])
}

/// Execute the per-file diff comparison
pub fn execute_file_diff(args: FileDiffArgs) -> Result<()> {
    info!(
        "per-file diff comparison: {} -> {}",
        args.input.display(),
        args.output.display()
    );

    let mut diff_time = AggregationMatrix::new();
    let mut diff_size = AggregationMatrix::new();
    let mut merge_time = AggregationMatrix::new();

    let source = RecordSource::new(&args.input);
    for record in source.records().context("failed to open input")? {
        let record = record?;
        match record.task_name.as_str() {
            "diff-per-file" => {
                let entry_type = record.label(LABEL_TYPE)?;
                let compression = record.label(LABEL_COMPRESSION)?;
                let size = record.measurement(FIELD_SIZE)?;
                let elapsed = record.measurement(FIELD_ELAPSED_MS)?;
                let compressed: f64 = record.label(LABEL_COMPRESSED_SIZE)?.parse()?;

                let series = SeriesKey::new([entry_type.clone(), compression.clone()]);
                diff_time.put(
                    series.clone(),
                    VariantKey::unit(),
                    Observation::Point {
                        x: size,
                        y: elapsed,
                    },
                    AccumulatorKind::Series,
                )?;
                diff_size.put(
                    series,
                    VariantKey::unit(),
                    Observation::Point {
                        x: size,
                        y: compressed,
                    },
                    AccumulatorKind::Series,
                )?;

                // file diffs issued by the merger belong in the merge panel
                if entry_type == "file_diff" && record.label_opt(LABEL_OBJ).as_deref() == Some("merge")
                {
                    merge_time.put(
                        SeriesKey::new(["diff".to_string(), compression]),
                        VariantKey::unit(),
                        Observation::Point {
                            x: size,
                            y: elapsed,
                        },
                        AccumulatorKind::Series,
                    )?;
                }
            }
            "merge-per-file" => {
                let mode = record.label(LABEL_MERGE_MODE)?;
                if mode == "copy-upper" || mode == "copy-lower" {
                    continue;
                }
                let series = SeriesKey::new([mode, record.label(LABEL_COMPRESSION)?]);
                merge_time.put(
                    series,
                    VariantKey::unit(),
                    Observation::Point {
                        x: record.measurement(FIELD_SIZE)?,
                        y: record.measurement(FIELD_ELAPSED_MS)?,
                    },
                    AccumulatorKind::Series,
                )?;
            }
            _ => {}
        }
    }

    let mut panels = Vec::new();
    for (title, y_desc, matrix, label) in [
        (
            "diff_time",
            "Milliseconds",
            &diff_time,
            type_label as fn(&SeriesKey) -> String,
        ),
        ("diff_size", "bytes", &diff_size, type_label),
        ("merge_time", "Milliseconds", &merge_time, mode_label),
    ] {
        let mut groups = Vec::new();
        for series in matrix.series_order() {
            let cell = matrix.cell(series, &VariantKey::unit())?;
            groups.push((label(series), cell.points()?.to_vec()));
        }
        panels.push(Panel::Scatter(ScatterPanel {
            title: title.to_string(),
            x_desc: "File size (bytes)".to_string(),
            y_desc: y_desc.to_string(),
            groups,
        }));
    }

    prepare_output_path(&args.output)?;
    render_figure(&Figure::column(panels), &args.output).context("failed to render figure")?;
    Ok(())
}
