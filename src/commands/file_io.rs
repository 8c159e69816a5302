//! File I/O latency comparison.
//!
//! Scatters open/read/open+read latency against file size, grouped by the
//! mount the path lives on (`pathLabel`), and reduces per-byte latency to
//! mean/std summary bars per mount. The open+read summary stacks the open
//! and read means. Zero-byte files are excluded before per-byte
//! normalization.

use crate::aggregator::{
    mean, per_unit, std_dev, AccumulatorKind, AggregationMatrix, Observation, SeriesKey,
    VariantKey,
};
use crate::output::prepare_output_path;
use crate::parser::RecordSource;
use crate::render::{render_figure, CategoryBarPanel, Figure, Panel, ScatterPanel};
use crate::utils::config::{FIELD_ELAPSED_US, FIELD_SIZE, LABEL_PATH_LABEL};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

const IO_TASKS: &[&str] = &["open", "read", "open+read"];

/// Arguments for the file I/O comparison
#[derive(Debug, Clone)]
pub struct FileIoArgs {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Scatter points and per-byte values accumulated for one I/O task.
struct TaskStats {
    points: AggregationMatrix,
    per_byte: AggregationMatrix,
}

impl TaskStats {
    fn new() -> Self {
        Self {
            points: AggregationMatrix::new(),
            per_byte: AggregationMatrix::new(),
        }
    }

    fn accumulate(&mut self, mount: &SeriesKey, size: f64, elapsed: f64) -> Result<()> {
        self.points.put(
            mount.clone(),
            VariantKey::unit(),
            Observation::Point {
                x: size,
                y: elapsed,
            },
            AccumulatorKind::Series,
        )?;
        self.per_byte.put(
            mount.clone(),
            VariantKey::unit(),
            Observation::Point {
                x: size,
                y: per_unit(elapsed, size)?,
            },
            AccumulatorKind::Series,
        )?;
        Ok(())
    }

    fn scatter_groups(&self) -> Result<Vec<(String, Vec<(f64, f64)>)>> {
        let mut groups = Vec::new();
        for mount in self.points.series_order() {
            let cell = self.points.cell(mount, &VariantKey::unit())?;
            groups.push((mount.to_string(), cell.points()?.to_vec()));
        }
        Ok(groups)
    }

    /// Per-byte mean for one mount.
    fn mount_mean(&self, mount: &SeriesKey) -> Result<f64> {
        let cell = self.per_byte.cell(mount, &VariantKey::unit())?;
        let values: Vec<f64> = cell.points()?.iter().map(|(_, v)| *v).collect();
        Ok(mean(&values)?)
    }

    fn log_summary(&self, task: &str) -> Result<()> {
        for mount in self.per_byte.series_order() {
            let cell = self.per_byte.cell(mount, &VariantKey::unit())?;
            let values: Vec<f64> = cell.points()?.iter().map(|(_, v)| *v).collect();
            info!(
                "{} on {}: mean {:.6} us/byte, std {:.6} ({} samples)",
                task,
                mount,
                mean(&values)?,
                std_dev(&values)?,
                values.len()
            );
        }
        Ok(())
    }
}

/// Execute the file I/O comparison
pub fn execute_file_io(args: FileIoArgs) -> Result<()> {
    info!(
        "file I/O comparison: {} -> {}",
        args.input.display(),
        args.output.display()
    );

    let mut open = TaskStats::new();
    let mut read = TaskStats::new();
    let mut open_read = TaskStats::new();

    let source = RecordSource::new(&args.input);
    let mut skipped = 0usize;
    for record in source.records().context("failed to open input")? {
        let record = record?;
        if !IO_TASKS.contains(&record.task_name.as_str()) {
            continue;
        }
        let size = record.measurement(FIELD_SIZE)?;
        if size == 0.0 {
            // zero-byte files would divide by zero in per-byte normalization
            skipped += 1;
            continue;
        }
        let mount = SeriesKey::new([record.label(LABEL_PATH_LABEL)?]);
        let elapsed = record.measurement(FIELD_ELAPSED_US)?;
        match record.task_name.as_str() {
            "open" => open.accumulate(&mount, size, elapsed)?,
            "read" => read.accumulate(&mount, size, elapsed)?,
            _ => open_read.accumulate(&mount, size, elapsed)?,
        }
    }
    debug!("skipped {} zero-byte records", skipped);

    open.log_summary("open")?;
    read.log_summary("read")?;
    open_read.log_summary("open+read")?;

    // mounts compared in the summary bars, in first-appearance order
    let mounts = open.per_byte.series_order().to_vec();
    let categories: Vec<String> = mounts.iter().map(|m| m.to_string()).collect();

    let open_means = mounts
        .iter()
        .map(|m| open.mount_mean(m))
        .collect::<Result<Vec<_>>>()?;
    let read_means = mounts
        .iter()
        .map(|m| read.mount_mean(m))
        .collect::<Result<Vec<_>>>()?;

    let panels = vec![
        Panel::Scatter(ScatterPanel {
            title: "File I/O (open)".to_string(),
            x_desc: String::new(),
            y_desc: "Elapsed (microseconds)".to_string(),
            groups: open.scatter_groups()?,
        }),
        Panel::CategoryBars(CategoryBarPanel {
            title: "File I/O (open) per byte".to_string(),
            y_desc: "Elapsed Microseconds / byte".to_string(),
            categories: categories.clone(),
            layers: vec![("open".to_string(), open_means.clone())],
        }),
        Panel::Scatter(ScatterPanel {
            title: "File I/O (read)".to_string(),
            x_desc: String::new(),
            y_desc: "Elapsed (microseconds)".to_string(),
            groups: read.scatter_groups()?,
        }),
        Panel::CategoryBars(CategoryBarPanel {
            title: "File I/O (read) per byte".to_string(),
            y_desc: "Elapsed Microseconds / byte".to_string(),
            categories: categories.clone(),
            layers: vec![("read".to_string(), read_means.clone())],
        }),
        Panel::Scatter(ScatterPanel {
            title: "File I/O (open+read)".to_string(),
            x_desc: "File size (bytes)".to_string(),
            y_desc: "Elapsed (microseconds)".to_string(),
            groups: open_read.scatter_groups()?,
        }),
        Panel::CategoryBars(CategoryBarPanel {
            title: "File I/O (open+read) per byte".to_string(),
            y_desc: "Elapsed Microseconds / byte".to_string(),
            categories,
            layers: vec![
                ("open".to_string(), open_means),
                ("read".to_string(), read_means),
            ],
        }),
    ];

    prepare_output_path(&args.output)?;
    render_figure(&Figure::grid(panels, 2), &args.output).context("failed to render figure")?;
    Ok(())
}
