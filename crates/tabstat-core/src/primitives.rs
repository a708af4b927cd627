//! Weighted arithmetic primitives injected into every calculator
//!
//! Calculators never call the free functions of this crate directly; they are
//! constructed with a `StatPrimitives` value and go through it. The default
//! method bodies are the reference implementation, so a backend only has to
//! name itself.
//!
//! # Usage
//!
//! ```rust
//! use tabstat_core::{ScalarPrimitives, StatPrimitives};
//!
//! let p = ScalarPrimitives::new();
//! let mean = p.weighted_mean(&[1.0, 2.0, 3.0], Some(&[1.0, 1.0, 2.0]));
//! assert_eq!(mean, Some(2.25));
//! ```

use crate::moments::Moments;

/// Weighted statistics over `(values, weights)` pairs
///
/// `values` are already filtered to valid cases; `weights`, when present,
/// has the same length and holds only usable weights.
pub trait StatPrimitives: Clone + Send + Sync {
    /// Name of this backend
    fn backend_name(&self) -> &'static str;

    /// Σw, or the number of values when unweighted
    fn total_weight(&self, values: &[f64], weights: Option<&[f64]>) -> f64 {
        match weights {
            Some(w) => w.iter().sum(),
            None => values.len() as f64,
        }
    }

    /// Σw·x
    fn weighted_sum(&self, values: &[f64], weights: Option<&[f64]>) -> f64 {
        match weights {
            Some(w) => values.iter().zip(w).map(|(x, w)| x * w).sum(),
            None => values.iter().sum(),
        }
    }

    /// Σw·x / Σw; `None` when the total weight is zero
    fn weighted_mean(&self, values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
        let w = self.total_weight(values, weights);
        (w > 0.0).then(|| self.weighted_sum(values, weights) / w)
    }

    /// Two-pass sample variance; `None` when `Σw ≤ 1`
    fn weighted_variance(&self, values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
        self.moments(values, weights)?.variance()
    }

    fn weighted_std_dev(&self, values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
        self.weighted_variance(values, weights).map(f64::sqrt)
    }

    fn weighted_skewness(&self, values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
        self.moments(values, weights)?.skewness()
    }

    fn weighted_kurtosis(&self, values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
        self.moments(values, weights)?.kurtosis()
    }

    /// All moments in one pass pair
    fn moments(&self, values: &[f64], weights: Option<&[f64]>) -> Option<Moments> {
        Moments::compute(values, weights)
    }
}

/// Plain sequential `f64` backend
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarPrimitives;

impl ScalarPrimitives {
    pub fn new() -> Self {
        Self
    }
}

impl StatPrimitives for ScalarPrimitives {
    fn backend_name(&self) -> &'static str {
        "scalar"
    }
}

/// Create the scalar backend
pub fn scalar_primitives() -> ScalarPrimitives {
    ScalarPrimitives::new()
}

/// Weighted mean with the scalar backend
pub fn weighted_mean(values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
    ScalarPrimitives.weighted_mean(values, weights)
}

/// Weighted sample variance with the scalar backend
pub fn weighted_variance(values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
    ScalarPrimitives.weighted_variance(values, weights)
}

/// Weighted standard deviation with the scalar backend
pub fn weighted_std_dev(values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
    ScalarPrimitives.weighted_std_dev(values, weights)
}

/// Weighted bias-corrected skewness with the scalar backend
pub fn weighted_skewness(values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
    ScalarPrimitives.weighted_skewness(values, weights)
}

/// Weighted bias-corrected excess kurtosis with the scalar backend
pub fn weighted_kurtosis(values: &[f64], weights: Option<&[f64]>) -> Option<f64> {
    ScalarPrimitives.weighted_kurtosis(values, weights)
}
