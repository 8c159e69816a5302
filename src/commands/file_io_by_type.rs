//! File I/O latency grouped by diff entry type.
//!
//! Two inputs: the diff detail log supplies, per image pair, each file's
//! entry disposition (new / same / diff); the I/O log supplies first-touch
//! latencies on the di3fs mount. The scatter groups I/O cost by what the
//! diff did to the file.

use crate::aggregator::{
    field, AccumulatorKind, AggregationMatrix, EntryType, KeySpec, Observation, SeriesKey,
    VariantKey,
};
use crate::output::prepare_output_path;
use crate::parser::RecordSource;
use crate::render::{render_figure, Figure, Panel, ScatterPanel};
use crate::utils::config::{
    FIELD_ELAPSED_US, FIELD_ENTRY_TYPE, FIELD_PATH, FIELD_SIZE, LABEL_COUNT, LABEL_IMAGE_NAME,
    LABEL_NEW, LABEL_OLD, LABEL_PATH, LABEL_PATH_LABEL, LABEL_ROOT,
};
use crate::utils::error::AggregateError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::path::PathBuf;

/// Arguments for the by-entry-type I/O comparison
#[derive(Debug, Clone)]
pub struct FileIoByTypeArgs {
    pub diff_input: PathBuf,
    pub io_input: PathBuf,
    pub output: PathBuf,
}

/// Execute the by-entry-type I/O comparison
pub fn execute_file_io_by_type(args: FileIoByTypeArgs) -> Result<()> {
    info!(
        "file I/O by entry type: {} + {} -> {}",
        args.diff_input.display(),
        args.io_input.display(),
        args.output.display()
    );

    let pair_spec = KeySpec::new(&[
        field(LABEL_IMAGE_NAME),
        field(LABEL_OLD),
        field(LABEL_NEW),
    ]);

    // pass 1: per image pair, each file's entry disposition
    let mut entry_types: HashMap<SeriesKey, HashMap<String, EntryType>> = HashMap::new();
    let diff_source = RecordSource::new(&args.diff_input);
    for record in diff_source.records().context("failed to open diff input")? {
        let record = record?;
        let pair = pair_spec.series(&record)?;
        let path = record.text(FIELD_PATH)?.to_string();
        let code = record.measurement(FIELD_ENTRY_TYPE)? as i64;
        let entry_type = EntryType::classify(code, record.line)?;
        entry_types.entry(pair).or_default().insert(path, entry_type);
    }
    debug!("entry types for {} image pairs", entry_types.len());

    // pass 2: first-touch di3fs I/O, grouped by the file's disposition
    let mut stat_open = AggregationMatrix::new();
    let mut stat_read = AggregationMatrix::new();
    let mut stat_open_read = AggregationMatrix::new();

    let io_source = RecordSource::new(&args.io_input);
    for record in io_source.records().context("failed to open io input")? {
        let record = record?;
        let matrix = match record.task_name.as_str() {
            "open" => &mut stat_open,
            "read" => &mut stat_read,
            "open+read" => &mut stat_open_read,
            _ => continue,
        };
        let size = record.measurement(FIELD_SIZE)?;
        if size == 0.0 {
            continue;
        }
        if record.label(LABEL_PATH_LABEL)? != "di3fs" {
            continue;
        }
        // only the first touch of each file is representative
        if record.label(LABEL_COUNT)? != "0" {
            continue;
        }

        let root = record.label(LABEL_ROOT)?;
        let path = record.label(LABEL_PATH)?.replacen(&root, "", 1);
        let pair = pair_spec.series(&record)?;
        let entry_type = entry_types
            .get(&pair)
            .and_then(|files| files.get(&path))
            .copied()
            .ok_or_else(|| AggregateError::MissingCell {
                series: pair.to_string(),
                variant: path.clone(),
            })?;

        matrix.put(
            SeriesKey::new([format!("EntryType {}", entry_type.as_str())]),
            VariantKey::unit(),
            Observation::Point {
                x: size,
                y: record.measurement(FIELD_ELAPSED_US)?,
            },
            AccumulatorKind::Series,
        )?;
    }

    let mut panels = Vec::new();
    for (title, matrix) in [
        ("File I/O (open)", &stat_open),
        ("File I/O (read)", &stat_read),
        ("File I/O (open+read)", &stat_open_read),
    ] {
        let mut groups = Vec::new();
        for series in matrix.series_order() {
            let cell = matrix.cell(series, &VariantKey::unit())?;
            groups.push((series.to_string(), cell.points()?.to_vec()));
        }
        panels.push(Panel::Scatter(ScatterPanel {
            title: title.to_string(),
            x_desc: "File size (bytes)".to_string(),
            y_desc: "Elapsed (microseconds)".to_string(),
            groups,
        }));
    }

    prepare_output_path(&args.output)?;
    render_figure(&Figure::column(panels), &args.output).context("failed to render figure")?;
    Ok(())
}
