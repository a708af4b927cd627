//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;

use tabstat_core::CellValue;

pub const EPSILON: f64 = 1e-9;

/// Numeric column with `None` as system-missing
pub fn numeric_column(values: &[Option<f64>]) -> Vec<CellValue> {
    values.iter().map(|v| CellValue::from(*v)).collect()
}

/// Column of plain numbers
pub fn numbers(values: &[f64]) -> Vec<CellValue> {
    values.iter().map(|&v| CellValue::Number(v)).collect()
}

/// Replicate each value `weight` times
pub fn replicate(values: &[f64], weights: &[u32]) -> Vec<f64> {
    values
        .iter()
        .zip(weights)
        .flat_map(|(&v, &w)| std::iter::repeat(v).take(w as usize))
        .collect()
}
