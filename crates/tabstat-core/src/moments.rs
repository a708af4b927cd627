//! Weighted moments
//!
//! All moments use the frequency-weight convention: the effective sample size
//! is the total weight `W = Σw` of the valid cases. Unweighted input has
//! `W = n`. Skewness and kurtosis carry the small-sample bias corrections used
//! by SPSS (and Excel's SKEW/KURT):
//!
//! ```text
//! variance  = M2 / (W - 1)
//! skewness  = W·M3 / ((W-1)(W-2)·s³)
//! kurtosis  = (W(W+1)·M4 - 3·M2²·(W-1)) / ((W-1)(W-2)(W-3)·s⁴)
//! ```
//!
//! where `Mk = Σ w·(x - x̄)^k`. Statistics that cannot be derived from the
//! sample are `None`.

use serde::Serialize;

/// Summary moments of a weighted sample, computed in two passes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Moments {
    /// Number of cases
    pub count: usize,
    /// Total weight
    pub total_weight: f64,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Σ w·(x - mean)²
    pub m2: f64,
    /// Σ w·(x - mean)³
    pub m3: f64,
    /// Σ w·(x - mean)⁴
    pub m4: f64,
}

impl Moments {
    /// Compute moments; `None` when there are no cases or no weight
    ///
    /// `weights` must be as long as `values`; a missing weight slice means
    /// every case has weight 1.
    pub fn compute(values: &[f64], weights: Option<&[f64]>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        debug_assert!(weights.map_or(true, |w| w.len() == values.len()));
        let weight = |i: usize| weights.map_or(1.0, |w| w[i]);

        let mut total_weight = 0.0;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (i, &x) in values.iter().enumerate() {
            let w = weight(i);
            total_weight += w;
            sum += w * x;
            min = min.min(x);
            max = max.max(x);
        }
        if total_weight <= 0.0 {
            return None;
        }
        let mean = sum / total_weight;

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for (i, &x) in values.iter().enumerate() {
            let w = weight(i);
            let d = x - mean;
            let d2 = d * d;
            m2 += w * d2;
            m3 += w * d2 * d;
            m4 += w * d2 * d2;
        }

        Some(Self {
            count: values.len(),
            total_weight,
            sum,
            mean,
            min,
            max,
            m2,
            m3,
            m4,
        })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Sample variance; needs `W > 1`
    pub fn variance(&self) -> Option<f64> {
        let w = self.total_weight;
        (w > 1.0).then(|| self.m2 / (w - 1.0))
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Standard error of the mean
    pub fn se_mean(&self) -> Option<f64> {
        self.std_dev().map(|s| s / self.total_weight.sqrt())
    }

    /// Bias-corrected skewness; needs `W > 2` and non-zero spread
    pub fn skewness(&self) -> Option<f64> {
        let w = self.total_weight;
        let s = self.std_dev().filter(|s| *s > 0.0)?;
        (w > 2.0).then(|| w * self.m3 / ((w - 1.0) * (w - 2.0) * s.powi(3)))
    }

    /// Bias-corrected excess kurtosis; needs `W > 3` and non-zero spread
    pub fn kurtosis(&self) -> Option<f64> {
        let w = self.total_weight;
        let s = self.std_dev().filter(|s| *s > 0.0)?;
        if w <= 3.0 {
            return None;
        }
        let numerator = w * (w + 1.0) * self.m4 - 3.0 * self.m2 * self.m2 * (w - 1.0);
        let denominator = (w - 1.0) * (w - 2.0) * (w - 3.0) * s.powi(4);
        Some(numerator / denominator)
    }

    pub fn se_skewness(&self) -> Option<f64> {
        se_skewness(self.total_weight)
    }

    pub fn se_kurtosis(&self) -> Option<f64> {
        se_kurtosis(self.total_weight)
    }
}

/// Standard error of skewness for effective sample size `w`
///
/// `√(6W(W−1) / ((W−2)(W+1)(W+3)))`, defined for `W > 2`.
pub fn se_skewness(w: f64) -> Option<f64> {
    (w > 2.0).then(|| (6.0 * w * (w - 1.0) / ((w - 2.0) * (w + 1.0) * (w + 3.0))).sqrt())
}

/// Standard error of kurtosis for effective sample size `w`
///
/// `√(4(W²−1)·SE(skew)² / ((W−3)(W+5)))`, defined for `W > 3`.
pub fn se_kurtosis(w: f64) -> Option<f64> {
    if w <= 3.0 {
        return None;
    }
    let se_skew = se_skewness(w)?;
    Some((4.0 * (w * w - 1.0) * se_skew * se_skew / ((w - 3.0) * (w + 5.0))).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_moments() {
        let m = Moments::compute(&[1.0, 2.0, 3.0, 4.0, 5.0], None).unwrap();
        assert_eq!(m.mean, 3.0);
        assert_eq!(m.sum, 15.0);
        assert_eq!(m.min, 1.0);
        assert_eq!(m.max, 5.0);
        assert_eq!(m.range(), 4.0);
        assert_relative_eq!(m.variance().unwrap(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(m.std_dev().unwrap(), 2.5f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(m.skewness().unwrap(), 0.0, epsilon = 1e-12);
        // Excel KURT(1,2,3,4,5) = -1.2
        assert_relative_eq!(m.kurtosis().unwrap(), -1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_skewed_sample() {
        // Excel SKEW(1,2,3,4,10) = 1.6971...
        let m = Moments::compute(&[1.0, 2.0, 3.0, 4.0, 10.0], None).unwrap();
        assert_relative_eq!(m.skewness().unwrap(), 1.697_056_274_847_714, epsilon = 1e-9);
    }

    #[test]
    fn test_weighted_equals_replicated() {
        let weighted = Moments::compute(&[1.0, 2.0, 5.0], Some(&[2.0, 1.0, 3.0])).unwrap();
        let replicated = Moments::compute(&[1.0, 1.0, 2.0, 5.0, 5.0, 5.0], None).unwrap();
        assert_relative_eq!(weighted.mean, replicated.mean, epsilon = 1e-12);
        assert_relative_eq!(weighted.variance().unwrap(), replicated.variance().unwrap(), epsilon = 1e-12);
        assert_relative_eq!(weighted.skewness().unwrap(), replicated.skewness().unwrap(), epsilon = 1e-12);
        assert_relative_eq!(weighted.kurtosis().unwrap(), replicated.kurtosis().unwrap(), epsilon = 1e-12);
        assert_eq!(weighted.count, 3);
        assert_eq!(weighted.total_weight, 6.0);
    }

    #[test]
    fn test_not_computable() {
        assert!(Moments::compute(&[], None).is_none());

        let single = Moments::compute(&[4.0], None).unwrap();
        assert_eq!(single.mean, 4.0);
        assert!(single.variance().is_none());
        assert!(single.std_dev().is_none());
        assert!(single.se_mean().is_none());
        assert!(single.skewness().is_none());
        assert!(single.kurtosis().is_none());

        let constant = Moments::compute(&[2.0, 2.0, 2.0, 2.0], None).unwrap();
        assert_eq!(constant.variance(), Some(0.0));
        assert!(constant.skewness().is_none());
        assert!(constant.kurtosis().is_none());

        let three = Moments::compute(&[1.0, 2.0, 4.0], None).unwrap();
        assert!(three.skewness().is_some());
        assert!(three.kurtosis().is_none());
    }

    #[test]
    fn test_standard_errors() {
        // SPSS reports .913 and 2.000 for N = 5
        assert_relative_eq!(se_skewness(5.0).unwrap(), 0.912_870_929_175_276_9, epsilon = 1e-12);
        assert_relative_eq!(se_kurtosis(5.0).unwrap(), 2.0, epsilon = 1e-12);
        assert!(se_skewness(2.0).is_none());
        assert!(se_kurtosis(3.0).is_none());
    }
}
