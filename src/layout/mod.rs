//! Deterministic comparison layout for grouped visual marks.
//!
//! Placement is a pure function of the declared series/variant orderings
//! and the group width: identical inputs produce bit-identical offsets
//! across independent invocations, so side-by-side panels line up.

use crate::aggregator::{AggregationMatrix, SeriesKey, VariantKey};
use crate::utils::error::LayoutError;
use log::debug;

/// Placement geometry and resolved values for one grouped-bar panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPlan {
    pub group_width: f64,
    /// `offsets[i][j]`: left edge of the mark for series `i`, variant `j`
    pub offsets: Vec<Vec<f64>>,
    /// `values[i][j]`: scalar accumulated for (series `i`, variant `j`)
    pub values: Vec<Vec<f64>>,
    pub series_labels: Vec<String>,
    pub variant_labels: Vec<String>,
}

impl PlacementPlan {
    fn variant_count(&self) -> usize {
        self.variant_labels.len()
    }

    /// Stride from one series group's origin to the next: the marks of one
    /// series plus a fixed gap of one extra group width.
    fn stride(&self) -> f64 {
        (self.variant_count() as f64 + 1.0) * self.group_width
    }

    /// Width actually covered by one series' marks.
    fn group_span(&self) -> f64 {
        self.variant_count() as f64 * self.group_width
    }

    /// Center of each series group on the x axis, for tick labels.
    pub fn tick_positions(&self) -> Vec<f64> {
        let span = self.group_span();
        (0..self.series_labels.len())
            .map(|i| i as f64 * self.stride() + span / 2.0)
            .collect()
    }

    /// Rightmost x coordinate any mark reaches.
    pub fn x_extent(&self) -> f64 {
        match self.series_labels.len() {
            0 => 0.0,
            n => (n as f64 - 1.0) * self.stride() + self.group_span(),
        }
    }

    /// Largest resolved value, for sizing the y axis.
    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(0.0_f64, f64::max)
    }
}

/// Compute mark placement for every (series, variant) pair.
///
/// The offset of the mark for series `i`, variant `j` is
/// `i * (variant_count + 1) * group_width + j * group_width`: all marks of
/// one series are contiguous and consecutive series are separated by a gap
/// of one extra group width.
///
/// # Errors
/// * `LayoutError::MissingVariant` - a declared variant has no accumulated
///   cell for some series; never substituted with a silent zero-fill
/// * `LayoutError::Value` - a cell has no scalar view
pub fn layout(
    matrix: &AggregationMatrix,
    series_order: &[SeriesKey],
    variant_order: &[VariantKey],
    group_width: f64,
) -> Result<PlacementPlan, LayoutError> {
    debug!(
        "laying out {} series x {} variants",
        series_order.len(),
        variant_order.len()
    );

    let stride = (variant_order.len() as f64 + 1.0) * group_width;
    let mut offsets = Vec::with_capacity(series_order.len());
    let mut values = Vec::with_capacity(series_order.len());

    for (i, series) in series_order.iter().enumerate() {
        let mut row_offsets = Vec::with_capacity(variant_order.len());
        let mut row_values = Vec::with_capacity(variant_order.len());
        for (j, variant) in variant_order.iter().enumerate() {
            let cell =
                matrix
                    .cell(series, variant)
                    .map_err(|_| LayoutError::MissingVariant {
                        series: series.to_string(),
                        variant: variant.to_string(),
                    })?;
            row_offsets.push(i as f64 * stride + j as f64 * group_width);
            row_values.push(cell.scalar()?);
        }
        offsets.push(row_offsets);
        values.push(row_values);
    }

    Ok(PlacementPlan {
        group_width,
        offsets,
        values,
        series_labels: series_order.iter().map(|k| k.to_string()).collect(),
        variant_labels: variant_order.iter().map(|k| k.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{AccumulatorKind, Observation};

    fn populated_matrix() -> (AggregationMatrix, Vec<SeriesKey>, Vec<VariantKey>) {
        let series = vec![
            SeriesKey::new(["nginx", "1", "2"]),
            SeriesKey::new(["redis", "6", "7"]),
        ];
        let variants = vec![
            VariantKey::new(["1", "bsdiffx"]),
            VariantKey::new(["1", "xdelta3"]),
            VariantKey::new(["8", "bsdiffx"]),
        ];
        let mut matrix = AggregationMatrix::new();
        for (i, s) in series.iter().enumerate() {
            for (j, v) in variants.iter().enumerate() {
                matrix
                    .put(
                        s.clone(),
                        v.clone(),
                        Observation::Scalar((i * 10 + j) as f64),
                        AccumulatorKind::Last,
                    )
                    .unwrap();
            }
        }
        (matrix, series, variants)
    }

    #[test]
    fn test_offset_formula() {
        let (matrix, series, variants) = populated_matrix();
        let plan = layout(&matrix, &series, &variants, 0.5).unwrap();

        // offset(i, j) = i * (variant_count + 1) * w + j * w
        for i in 0..series.len() {
            for j in 0..variants.len() {
                let expected = i as f64 * 4.0 * 0.5 + j as f64 * 0.5;
                assert_eq!(plan.offsets[i][j], expected);
            }
        }
        assert_eq!(plan.values[1][2], 12.0);
    }

    #[test]
    fn test_placement_is_deterministic() {
        let (matrix, series, variants) = populated_matrix();
        let a = layout(&matrix, &series, &variants, 0.4).unwrap();
        let b = layout(&matrix, &series, &variants, 0.4).unwrap();
        assert_eq!(a, b);
        for (row_a, row_b) in a.offsets.iter().zip(b.offsets.iter()) {
            for (x_a, x_b) in row_a.iter().zip(row_b.iter()) {
                assert_eq!(x_a.to_bits(), x_b.to_bits());
            }
        }
    }

    #[test]
    fn test_series_groups_are_contiguous_with_gap() {
        let (matrix, series, variants) = populated_matrix();
        let plan = layout(&matrix, &series, &variants, 0.5).unwrap();

        // marks within a group are adjacent
        assert_eq!(plan.offsets[0][1] - plan.offsets[0][0], 0.5);
        // the gap between groups is one extra group width
        let last_of_first = plan.offsets[0][2] + 0.5;
        assert_eq!(plan.offsets[1][0] - last_of_first, 0.5);
    }

    #[test]
    fn test_missing_declared_variant_is_error() {
        let (matrix, series, mut variants) = populated_matrix();
        variants.push(VariantKey::new(["8", "xdelta3"]));
        let err = layout(&matrix, &series, &variants, 0.4).unwrap_err();
        assert!(matches!(err, LayoutError::MissingVariant { .. }));
    }

    #[test]
    fn test_tick_positions_and_extent() {
        let (matrix, series, variants) = populated_matrix();
        let plan = layout(&matrix, &series, &variants, 0.5).unwrap();
        let ticks = plan.tick_positions();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0], 0.75); // half the 3-bar group span
        assert_eq!(plan.x_extent(), 2.0 + 1.5); // one stride + one span
    }

    #[test]
    fn test_empty_matrix_layout() {
        let matrix = AggregationMatrix::new();
        let plan = layout(&matrix, &[], &[], 0.4).unwrap();
        assert_eq!(plan.x_extent(), 0.0);
        assert!(plan.tick_positions().is_empty());
    }
}
