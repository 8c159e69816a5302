//! Chart rendering via plotters.
//!
//! Turns finished placement plans and point sets into a single PNG figure
//! of panels. The renderer consumes layout geometry as-is; it never
//! reorders series or variants, so independent renders of the same
//! orderings stay comparable side by side.

use crate::layout::PlacementPlan;
use crate::utils::config::{FIGURE_HEIGHT, FIGURE_WIDTH};
use crate::utils::error::RenderError;
use log::info;
use plotters::coord::combinators::{BindKeyPoints, WithKeyPoints};
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

/// Wraps a custom-key-point `f64` axis so it satisfies `configure_mesh`'s
/// `ValueFormatter` bound. `WithKeyPoints<RangedCoordf64>` does not forward the
/// explicit `f64` value formatter in plotters 0.3, so the mesh builder can't be
/// called on it directly. This newtype delegates every `Ranged` operation and
/// the value formatting verbatim — tick positions, mapping, and labels are
/// unchanged.
struct LabeledAxis(WithKeyPoints<RangedCoordf64>);

impl Ranged for LabeledAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn range(&self) -> Range<f64> {
        self.0.range()
    }

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

impl ValueFormatter<f64> for LabeledAxis {
    fn format(value: &f64) -> String {
        <RangedCoordf64 as ValueFormatter<f64>>::format(value)
    }
}

/// One grouped-bar panel driven by a placement plan.
pub struct BarPanel {
    pub title: String,
    pub y_desc: String,
    pub plan: PlacementPlan,
}

/// One scatter panel: named groups of (x, y) points.
pub struct ScatterPanel {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub groups: Vec<(String, Vec<(f64, f64)>)>,
}

/// Categorical bars, one bar per category; layers stack bottom-up.
pub struct CategoryBarPanel {
    pub title: String,
    pub y_desc: String,
    pub categories: Vec<String>,
    /// (layer label, one value per category)
    pub layers: Vec<(String, Vec<f64>)>,
}

pub enum Panel {
    Bars(BarPanel),
    Scatter(ScatterPanel),
    CategoryBars(CategoryBarPanel),
}

/// A figure: panels arranged row-major in `cols` columns.
pub struct Figure {
    pub panels: Vec<Panel>,
    pub cols: usize,
}

impl Figure {
    /// Panels stacked in a single column.
    pub fn column(panels: Vec<Panel>) -> Self {
        Self { panels, cols: 1 }
    }

    pub fn grid(panels: Vec<Panel>, cols: usize) -> Self {
        Self { panels, cols }
    }
}

fn backend_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Backend(e.to_string())
}

/// Render a figure to a PNG file.
///
/// # Errors
/// * `RenderError::EmptyFigure` - the figure has no panels
/// * `RenderError::Backend` - drawing or file output failed
pub fn render_figure(figure: &Figure, output: &Path) -> Result<(), RenderError> {
    if figure.panels.is_empty() {
        return Err(RenderError::EmptyFigure);
    }

    let cols = figure.cols.max(1);
    let rows = figure.panels.len().div_ceil(cols);

    let root = BitMapBackend::new(output, (FIGURE_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;

    let areas = root.split_evenly((rows, cols));
    for (panel, area) in figure.panels.iter().zip(areas.iter()) {
        match panel {
            Panel::Bars(p) => draw_bars(p, area)?,
            Panel::Scatter(p) => draw_scatter(p, area)?,
            Panel::CategoryBars(p) => draw_category_bars(p, area)?,
        }
    }

    root.present().map_err(backend_err)?;
    info!("wrote figure: {}", output.display());
    Ok(())
}

fn draw_bars(
    panel: &BarPanel,
    area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), RenderError> {
    let plan = &panel.plan;
    let x_max = plan.x_extent().max(plan.group_width);
    let y_max = match plan.max_value() {
        v if v > 0.0 => v * 1.05,
        _ => 1.0,
    };
    let centers = plan.tick_positions();

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title.as_str(), ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            LabeledAxis((0.0..x_max).with_key_points(centers.clone())),
            0.0..y_max,
        )
        .map_err(backend_err)?;

    let series_labels = &plan.series_labels;
    let tick_label = |x: &f64| {
        centers
            .iter()
            .position(|c| (c - x).abs() < 1e-9)
            .map(|i| series_labels[i].clone())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(panel.y_desc.as_str())
        .x_label_formatter(&tick_label)
        .draw()
        .map_err(backend_err)?;

    for (j, label) in plan.variant_labels.iter().enumerate() {
        let color = Palette99::pick(j).mix(0.9);
        chart
            .draw_series(plan.offsets.iter().zip(plan.values.iter()).map(
                |(row_offsets, row_values)| {
                    let x0 = row_offsets[j];
                    Rectangle::new(
                        [(x0, 0.0), (x0 + plan.group_width, row_values[j])],
                        color.filled(),
                    )
                },
            ))
            .map_err(backend_err)?
            .label(label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.filled()));

        // black bar edges, matching the reference charts
        chart
            .draw_series(plan.offsets.iter().zip(plan.values.iter()).map(
                |(row_offsets, row_values)| {
                    let x0 = row_offsets[j];
                    Rectangle::new(
                        [(x0, 0.0), (x0 + plan.group_width, row_values[j])],
                        BLACK.stroke_width(1),
                    )
                },
            ))
            .map_err(backend_err)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(backend_err)?;
    Ok(())
}

fn draw_scatter(
    panel: &ScatterPanel,
    area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), RenderError> {
    let points = panel.groups.iter().flat_map(|(_, pts)| pts.iter());
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (x, y) in points {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    if !x_min.is_finite() {
        (x_min, x_max, y_min, y_max) = (0.0, 1.0, 0.0, 1.0);
    }
    let x_pad = ((x_max - x_min) * 0.05).max(1.0);
    let y_pad = ((y_max - y_min) * 0.05).max(1e-6);

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title.as_str(), ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            (x_min - x_pad)..(x_max + x_pad),
            (y_min - y_pad)..(y_max + y_pad),
        )
        .map_err(backend_err)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_desc.as_str())
        .y_desc(panel.y_desc.as_str())
        .draw()
        .map_err(backend_err)?;

    for (idx, (label, pts)) in panel.groups.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        chart
            .draw_series(pts.iter().map(|(x, y)| Circle::new((*x, *y), 3, color.filled())))
            .map_err(backend_err)?
            .label(label.as_str())
            .legend(move |(x, y)| Circle::new((x + 6, y), 3, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(backend_err)?;
    Ok(())
}

fn draw_category_bars(
    panel: &CategoryBarPanel,
    area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), RenderError> {
    let count = panel.categories.len();
    let x_max = count.max(1) as f64;
    // stacked layers size the axis by per-category totals
    let y_max = (0..count)
        .map(|i| panel.layers.iter().map(|(_, vs)| vs[i]).sum::<f64>())
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };
    let centers: Vec<f64> = (0..count).map(|i| i as f64 + 0.5).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title.as_str(), ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            LabeledAxis((0.0..x_max).with_key_points(centers.clone())),
            0.0..y_max,
        )
        .map_err(backend_err)?;

    let categories = &panel.categories;
    let tick_label = |x: &f64| {
        centers
            .iter()
            .position(|c| (c - x).abs() < 1e-9)
            .map(|i| categories[i].clone())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(panel.y_desc.as_str())
        .x_label_formatter(&tick_label)
        .draw()
        .map_err(backend_err)?;

    let mut bottoms = vec![0.0_f64; count];
    for (idx, (label, values)) in panel.layers.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        let starts = bottoms.clone();
        chart
            .draw_series(values.iter().enumerate().map(|(i, v)| {
                let x0 = i as f64 + 0.2;
                Rectangle::new([(x0, starts[i]), (x0 + 0.6, starts[i] + v)], color.filled())
            }))
            .map_err(backend_err)?
            .label(label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.filled()));
        for (i, v) in values.iter().enumerate() {
            bottoms[i] += v;
        }
    }

    if panel.layers.len() > 1 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(backend_err)?;
    }
    Ok(())
}
