//! Percentiles on the weighted empirical distribution
//!
//! Values are sorted, ties merged, and each distinct value `x_k` carries its
//! total weight `c_k` and cumulative weight `cc_k`. A target position `tc` is
//! located between `cc_k1 ≤ tc < cc_k1+1` and `g* = tc − cc_k1`; the methods
//! differ in the target and in how `g*` picks or blends `x_k1` and `x_k1+1`:
//!
//! | Method | Target | Result |
//! |--------|--------|--------|
//! | `haverage` | `(W+1)p` | blend by `g*` (scaled by `c` when `c < 1`) |
//! | `waverage` | `Wp` | same blend |
//! | `round` | `Wp` | `x_k1` if `g* < 0.5`, else `x_k1+1` |
//! | `empirical` | `Wp` | `x_k1` if `g* = 0`, else `x_k1+1` |
//! | `aempirical` | `Wp` | mean of both if `g* = 0`, else `x_k1+1` |
//!
//! Targets before the first case give the minimum, targets past the last give
//! the maximum. Boundary comparisons tolerate `FUZZ`.

use serde::{Deserialize, Serialize};
use tabstat_core::{Error, Result};

/// Tolerance for landing exactly on a cumulative weight boundary
pub const FUZZ: f64 = 1e-9;

/// Percentile definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentileMethod {
    /// Weighted average at `(W+1)p`
    #[default]
    Haverage,
    /// Weighted average at `Wp`
    Waverage,
    /// Observation closest to `Wp`
    Round,
    /// Empirical distribution function
    Empirical,
    /// Empirical distribution function with averaging
    Aempirical,
}

/// Estimator of percentiles from a prepared weighted sample
pub trait PercentileEstimator {
    fn name(&self) -> &'static str;

    /// Percentile `p` in `[0, 100]`; `None` for an empty sample
    fn percentile_sorted(&self, sample: &WeightedSample, p: f64) -> Option<f64>;

    fn percentiles_sorted(&self, sample: &WeightedSample, ps: &[f64]) -> Vec<Option<f64>> {
        ps.iter().map(|&p| self.percentile_sorted(sample, p)).collect()
    }
}

impl PercentileEstimator for PercentileMethod {
    fn name(&self) -> &'static str {
        match self {
            PercentileMethod::Haverage => "haverage",
            PercentileMethod::Waverage => "waverage",
            PercentileMethod::Round => "round",
            PercentileMethod::Empirical => "empirical",
            PercentileMethod::Aempirical => "aempirical",
        }
    }

    fn percentile_sorted(&self, sample: &WeightedSample, p: f64) -> Option<f64> {
        if sample.is_empty() {
            return None;
        }
        let p = p / 100.0;
        let w = sample.total_weight();
        match self {
            PercentileMethod::Haverage => sample.at_position((w + 1.0) * p),
            PercentileMethod::Waverage => sample.at_position(w * p),
            PercentileMethod::Round => {
                let (k, g) = sample.locate(w * p);
                Some(if g < 0.5 { sample.x(k) } else { sample.x(k + 1) })
            }
            PercentileMethod::Empirical => {
                let (k, g) = sample.locate(w * p);
                Some(if g == 0.0 { sample.x(k) } else { sample.x(k + 1) })
            }
            PercentileMethod::Aempirical => {
                let (k, g) = sample.locate(w * p);
                Some(if g == 0.0 {
                    (sample.x(k) + sample.x(k + 1)) / 2.0
                } else {
                    sample.x(k + 1)
                })
            }
        }
    }
}

/// Sorted distinct values with merged weights
///
/// Built from a copy; the caller's slices are never reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedSample {
    values: Vec<f64>,
    weights: Vec<f64>,
    cumulative: Vec<f64>,
}

impl WeightedSample {
    /// Prepare a sample of finite values with usable weights
    pub fn new(values: &[f64], weights: Option<&[f64]>) -> Self {
        let mut pairs: Vec<(f64, f64)> = match weights {
            Some(w) => values.iter().copied().zip(w.iter().copied()).collect(),
            None => values.iter().map(|&v| (v, 1.0)).collect(),
        };
        // weight as secondary key keeps tie sums independent of input order
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let mut sample = Self::default();
        for (v, w) in pairs {
            match sample.values.last() {
                Some(&last) if last == v => {
                    if let Some(acc) = sample.weights.last_mut() {
                        *acc += w;
                    }
                }
                _ => {
                    sample.values.push(v);
                    sample.weights.push(w);
                }
            }
        }
        let mut running = 0.0;
        sample.cumulative = sample
            .weights
            .iter()
            .map(|w| {
                running += w;
                running
            })
            .collect();
        sample
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn total_weight(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// `x_k` with 1-based `k`, clamped to the observed range
    fn x(&self, k: usize) -> f64 {
        let i = k.clamp(1, self.values.len()) - 1;
        self.values[i]
    }

    /// `(k1, g*)` for target position `tc`; `k1 = 0` means before the first case
    fn locate(&self, tc: f64) -> (usize, f64) {
        let k = self.cumulative.partition_point(|&cc| cc <= tc + FUZZ);
        let base = if k == 0 { 0.0 } else { self.cumulative[k - 1] };
        let g = tc - base;
        (k, if g.abs() < FUZZ { 0.0 } else { g.max(0.0) })
    }

    /// Weighted-average value at cumulative position `tc`
    ///
    /// Used by the averaging methods and by Tukey's hinges.
    pub fn at_position(&self, tc: f64) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let (k, g_star) = self.locate(tc);
        let n = self.values.len();
        if k == 0 {
            return self.min();
        }
        if k >= n {
            return self.max();
        }
        if g_star == 0.0 {
            return Some(self.x(k));
        }
        if g_star >= 1.0 {
            return Some(self.x(k + 1));
        }
        let c = self.weights[k];
        let g = if c >= 1.0 { g_star } else { g_star / c };
        Some((1.0 - g) * self.x(k) + g * self.x(k + 1))
    }

    pub fn median(&self) -> Option<f64> {
        PercentileMethod::Haverage.percentile_sorted(self, 50.0)
    }
}

/// Reject percentiles outside `[0, 100]`
pub fn validate_percentiles(ps: &[f64]) -> Result<()> {
    match ps.iter().find(|p| !(0.0..=100.0).contains(*p)) {
        Some(&p) => Err(Error::invalid_percentile(p)),
        None => Ok(()),
    }
}

/// Percentiles `100·i/k` splitting the sample into `k` equal groups
pub fn cut_points(k: usize) -> Vec<f64> {
    (1..k).map(|i| 100.0 * i as f64 / k as f64).collect()
}

/// Sorted, de-duplicated union of percentile requests
pub fn merge_percentiles(parts: &[&[f64]]) -> Vec<f64> {
    let mut all: Vec<f64> = parts.iter().flat_map(|p| p.iter().copied()).collect();
    all.sort_by(f64::total_cmp);
    all.dedup_by(|a, b| (*a - *b).abs() < FUZZ);
    all
}
