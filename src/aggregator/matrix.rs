//! Two-level aggregation store: series → variant → cell.
//!
//! The matrix is an explicit value owned by one analysis invocation and
//! passed by reference into each pipeline stage; there is no ambient or
//! static accumulation state. Series order is recorded explicitly at first
//! appearance, so nothing depends on map iteration order.

use super::keys::{SeriesKey, VariantKey};
use crate::utils::error::AggregateError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Merge policy applied when multiple records map to the same cell.
/// An explicit declared choice per analysis, never an implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorKind {
    /// Keep the most recent measurement; overwrites silently on repeat keys.
    Last,
    /// Maintain `(n, sum)` for averaging.
    CountSum,
    /// Append `(x, y)` points in arrival order, no deduplication.
    Series,
}

/// One observation fed to the store.
#[derive(Debug, Clone, Copy)]
pub enum Observation {
    Scalar(f64),
    Point { x: f64, y: f64 },
}

/// Accumulated value(s) for one (series, variant) pair.
///
/// Created on first matching record, mutated on every subsequent record
/// with the same key pair, read-only once the ingestion pass completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Last(f64),
    CountSum { n: u64, sum: f64 },
    Series(Vec<(f64, f64)>),
}

impl Cell {
    fn from_observation(
        kind: AccumulatorKind,
        observation: Observation,
    ) -> Result<Self, AggregateError> {
        let mut cell = match kind {
            AccumulatorKind::Last => Cell::Last(0.0),
            AccumulatorKind::CountSum => Cell::CountSum { n: 0, sum: 0.0 },
            AccumulatorKind::Series => Cell::Series(Vec::new()),
        };
        cell.merge(observation)?;
        Ok(cell)
    }

    fn kind(&self) -> AccumulatorKind {
        match self {
            Cell::Last(_) => AccumulatorKind::Last,
            Cell::CountSum { .. } => AccumulatorKind::CountSum,
            Cell::Series(_) => AccumulatorKind::Series,
        }
    }

    fn kind_name(&self) -> &'static str {
        kind_label(self.kind())
    }

    fn merge(&mut self, observation: Observation) -> Result<(), AggregateError> {
        match (self, observation) {
            (Cell::Last(value), Observation::Scalar(v)) => {
                *value = v;
                Ok(())
            }
            (Cell::CountSum { n, sum }, Observation::Scalar(v)) => {
                *n += 1;
                *sum += v;
                Ok(())
            }
            (Cell::Series(points), Observation::Point { x, y }) => {
                points.push((x, y));
                Ok(())
            }
            (cell, Observation::Scalar(_)) => Err(AggregateError::KindMismatch {
                expected: "scalar",
                found: cell.kind_name(),
            }),
            (cell, Observation::Point { .. }) => Err(AggregateError::KindMismatch {
                expected: "point",
                found: cell.kind_name(),
            }),
        }
    }

    /// Scalar view of the cell: the stored value for `Last`, the mean for
    /// `CountSum`. Series cells have no scalar view.
    pub fn scalar(&self) -> Result<f64, AggregateError> {
        match self {
            Cell::Last(value) => Ok(*value),
            Cell::CountSum { .. } => self.mean(),
            Cell::Series(_) => Err(AggregateError::KindMismatch {
                expected: "scalar",
                found: "series",
            }),
        }
    }

    /// Mean of a `CountSum` cell. Requesting a mean over zero samples is a
    /// division-by-zero, surfaced rather than coerced to NaN.
    pub fn mean(&self) -> Result<f64, AggregateError> {
        match self {
            Cell::CountSum { n: 0, .. } => Err(AggregateError::DivisionByZero {
                context: "mean of empty group".to_string(),
            }),
            Cell::CountSum { n, sum } => Ok(sum / *n as f64),
            other => Err(AggregateError::KindMismatch {
                expected: "count-sum",
                found: other.kind_name(),
            }),
        }
    }

    /// Accumulated points of a `Series` cell, in arrival order.
    pub fn points(&self) -> Result<&[(f64, f64)], AggregateError> {
        match self {
            Cell::Series(points) => Ok(points),
            other => Err(AggregateError::KindMismatch {
                expected: "series",
                found: other.kind_name(),
            }),
        }
    }
}

fn kind_label(kind: AccumulatorKind) -> &'static str {
    match kind {
        AccumulatorKind::Last => "last",
        AccumulatorKind::CountSum => "count-sum",
        AccumulatorKind::Series => "series",
    }
}

/// Full mapping of series → (variant → cell), built once per analysis run
/// and owned exclusively by that run.
#[derive(Debug, Default)]
pub struct AggregationMatrix {
    cells: HashMap<SeriesKey, HashMap<VariantKey, Cell>>,
    series_order: Vec<SeriesKey>,
}

impl AggregationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one observation into exactly one cell.
    pub fn put(
        &mut self,
        series: SeriesKey,
        variant: VariantKey,
        observation: Observation,
        kind: AccumulatorKind,
    ) -> Result<(), AggregateError> {
        if !self.cells.contains_key(&series) {
            self.series_order.push(series.clone());
        }
        match self.cells.entry(series).or_default().entry(variant) {
            Entry::Occupied(mut entry) => {
                let cell = entry.get_mut();
                if cell.kind() != kind {
                    return Err(AggregateError::KindMismatch {
                        expected: kind_label(kind),
                        found: cell.kind_name(),
                    });
                }
                cell.merge(observation)
            }
            Entry::Vacant(entry) => {
                entry.insert(Cell::from_observation(kind, observation)?);
                Ok(())
            }
        }
    }

    /// Read a cell. Reading before any `put` for that key pair is an error.
    pub fn cell(&self, series: &SeriesKey, variant: &VariantKey) -> Result<&Cell, AggregateError> {
        self.cells
            .get(series)
            .and_then(|by_variant| by_variant.get(variant))
            .ok_or_else(|| AggregateError::MissingCell {
                series: series.to_string(),
                variant: variant.to_string(),
            })
    }

    pub fn contains_series(&self, series: &SeriesKey) -> bool {
        self.cells.contains_key(series)
    }

    /// Series keys in first-appearance order.
    pub fn series_order(&self) -> &[SeriesKey] {
        &self.series_order
    }

    /// Number of distinct (series, variant) cells.
    pub fn cell_count(&self) -> usize {
        self.cells.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str) -> SeriesKey {
        SeriesKey::new([name, "1", "2"])
    }

    fn variant(enc: &str) -> VariantKey {
        VariantKey::new(["1", "none", "bzip2", enc])
    }

    #[test]
    fn test_cell_count_matches_distinct_key_pairs() {
        let mut matrix = AggregationMatrix::new();
        for (s, v, value) in [
            ("nginx", "bsdiffx", 10.0),
            ("nginx", "xdelta3", 20.0),
            ("redis", "bsdiffx", 30.0),
            ("nginx", "bsdiffx", 40.0), // repeat key pair, same cell
        ] {
            matrix
                .put(
                    series(s),
                    variant(v),
                    Observation::Scalar(value),
                    AccumulatorKind::Last,
                )
                .unwrap();
        }
        assert_eq!(matrix.cell_count(), 3);
        assert_eq!(matrix.series_order().len(), 2);
    }

    #[test]
    fn test_last_overwrites_silently() {
        let mut matrix = AggregationMatrix::new();
        for value in [10.0, 25.0] {
            matrix
                .put(
                    series("nginx"),
                    variant("bsdiffx"),
                    Observation::Scalar(value),
                    AccumulatorKind::Last,
                )
                .unwrap();
        }
        let cell = matrix.cell(&series("nginx"), &variant("bsdiffx")).unwrap();
        assert_eq!(cell.scalar().unwrap(), 25.0);
    }

    #[test]
    fn test_count_sum_mean() {
        let mut matrix = AggregationMatrix::new();
        for value in [3.0, 7.0] {
            matrix
                .put(
                    series("nginx"),
                    variant("bsdiffx"),
                    Observation::Scalar(value),
                    AccumulatorKind::CountSum,
                )
                .unwrap();
        }
        let cell = matrix.cell(&series("nginx"), &variant("bsdiffx")).unwrap();
        assert_eq!(*cell, Cell::CountSum { n: 2, sum: 10.0 });
        assert_eq!(cell.mean().unwrap(), 5.0);
    }

    #[test]
    fn test_count_sum_is_order_insensitive() {
        let values = [4.0, 9.0, 1.0, 6.0];
        let mut forward = AggregationMatrix::new();
        let mut backward = AggregationMatrix::new();
        for v in values {
            forward
                .put(
                    series("a"),
                    VariantKey::unit(),
                    Observation::Scalar(v),
                    AccumulatorKind::CountSum,
                )
                .unwrap();
        }
        for v in values.iter().rev() {
            backward
                .put(
                    series("a"),
                    VariantKey::unit(),
                    Observation::Scalar(*v),
                    AccumulatorKind::CountSum,
                )
                .unwrap();
        }
        assert_eq!(
            forward.cell(&series("a"), &VariantKey::unit()).unwrap(),
            backward.cell(&series("a"), &VariantKey::unit()).unwrap()
        );
    }

    #[test]
    fn test_series_appends_in_arrival_order() {
        let mut matrix = AggregationMatrix::new();
        for (x, y) in [(4096.0, 1.5), (1024.0, 0.5), (4096.0, 1.5)] {
            matrix
                .put(
                    series("nginx"),
                    VariantKey::unit(),
                    Observation::Point { x, y },
                    AccumulatorKind::Series,
                )
                .unwrap();
        }
        let cell = matrix.cell(&series("nginx"), &VariantKey::unit()).unwrap();
        // no deduplication, arrival order preserved
        assert_eq!(
            cell.points().unwrap(),
            &[(4096.0, 1.5), (1024.0, 0.5), (4096.0, 1.5)]
        );
    }

    #[test]
    fn test_missing_cell_read_is_error() {
        let matrix = AggregationMatrix::new();
        let err = matrix
            .cell(&series("nginx"), &variant("bsdiffx"))
            .unwrap_err();
        assert!(matches!(err, AggregateError::MissingCell { .. }));
    }

    #[test]
    fn test_observation_kind_mismatch() {
        let mut matrix = AggregationMatrix::new();
        let err = matrix
            .put(
                series("nginx"),
                VariantKey::unit(),
                Observation::Point { x: 1.0, y: 2.0 },
                AccumulatorKind::Last,
            )
            .unwrap_err();
        assert!(matches!(err, AggregateError::KindMismatch { .. }));
    }

    #[test]
    fn test_series_order_is_first_appearance() {
        let mut matrix = AggregationMatrix::new();
        for s in ["redis", "nginx", "redis", "apache"] {
            matrix
                .put(
                    series(s),
                    VariantKey::unit(),
                    Observation::Scalar(1.0),
                    AccumulatorKind::Last,
                )
                .unwrap();
        }
        let order: Vec<String> = matrix.series_order().iter().map(|k| k.to_string()).collect();
        assert_eq!(order, ["redis-1-2", "nginx-1-2", "apache-1-2"]);
    }
}
