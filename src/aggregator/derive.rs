//! Derived metrics over already-populated cells and raw value groups.
//!
//! Pure computations, no I/O. Zero-valued denominators standing for "not
//! applicable" (e.g. an empty file) must be excluded by the caller before
//! reaching this engine; nothing here coerces to zero or NaN.

use super::matrix::Cell;
use crate::utils::error::AggregateError;

/// Binary derivation over two scalar cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeriveOp {
    /// `a / b`, e.g. compression efficiency
    Ratio,
    /// `a / b` where `b` is a size, e.g. elapsed time per byte
    PerUnit,
}

/// Derive a value from two already-populated cells.
pub fn derive(a: &Cell, b: &Cell, op: DeriveOp) -> Result<f64, AggregateError> {
    match op {
        DeriveOp::Ratio => ratio(a.scalar()?, b.scalar()?),
        DeriveOp::PerUnit => per_unit(a.scalar()?, b.scalar()?),
    }
}

/// `a / b`.
pub fn ratio(a: f64, b: f64) -> Result<f64, AggregateError> {
    if b == 0.0 {
        return Err(AggregateError::DivisionByZero {
            context: "ratio denominator".to_string(),
        });
    }
    Ok(a / b)
}

/// Normalize a measurement by a size.
pub fn per_unit(value: f64, size: f64) -> Result<f64, AggregateError> {
    if size == 0.0 {
        return Err(AggregateError::DivisionByZero {
            context: "per-unit size".to_string(),
        });
    }
    Ok(value / size)
}

/// Arithmetic mean of a homogeneous group of raw values.
pub fn mean(values: &[f64]) -> Result<f64, AggregateError> {
    if values.is_empty() {
        return Err(AggregateError::DivisionByZero {
            context: "mean of empty group".to_string(),
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Result<f64, AggregateError> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(6.0, 3.0).unwrap(), 2.0);
    }

    #[test]
    fn test_ratio_zero_denominator_is_error_not_nan() {
        let err = ratio(6.0, 0.0).unwrap_err();
        assert!(matches!(err, AggregateError::DivisionByZero { .. }));
    }

    #[test]
    fn test_ratio_is_idempotent() {
        let first = ratio(1234.0, 17.0).unwrap();
        let second = ratio(1234.0, 17.0).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_per_unit() {
        assert_eq!(per_unit(500.0, 250.0).unwrap(), 2.0);
        assert!(per_unit(500.0, 0.0).is_err());
    }

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values).unwrap(), 5.0);
        assert_eq!(std_dev(&values).unwrap(), 2.0);
    }

    #[test]
    fn test_mean_of_empty_group() {
        assert!(matches!(
            mean(&[]),
            Err(AggregateError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_derive_over_cells() {
        let a = Cell::Last(9.0);
        let b = Cell::Last(3.0);
        assert_eq!(derive(&a, &b, DeriveOp::Ratio).unwrap(), 3.0);
        assert_eq!(derive(&a, &b, DeriveOp::PerUnit).unwrap(), 3.0);
        assert!(derive(&a, &Cell::Last(0.0), DeriveOp::Ratio).is_err());
    }
}
