//! M-estimators of location
//!
//! Each estimator is an iteratively reweighted mean. Starting from the
//! median, residuals are standardized by a fixed robust scale
//! `s = MAD / 0.6745` and every case is reweighted by its case weight times
//! `ψ(u)/u`. Iteration stops when the estimate moves by at most `1e-6·s`, or
//! after 50 rounds. A zero scale returns the median.

use tabstat_frequency::WeightedSample;

/// MAD of a standard normal sample
pub const MAD_NORMAL: f64 = 0.6745;
pub const MAX_ITERATIONS: usize = 50;
pub const TOLERANCE: f64 = 1e-6;

pub const HUBER_K: f64 = 1.339;
pub const TUKEY_C: f64 = 4.685;
pub const HAMPEL_A: f64 = 1.7;
pub const HAMPEL_B: f64 = 3.4;
pub const HAMPEL_C: f64 = 8.5;
/// Andrews' wave is cut off at `c·π`
pub const ANDREWS_C: f64 = 1.34;

/// An influence function, expressed as its IRLS weight `ψ(u)/u`
pub trait PsiFunction: Send + Sync {
    /// Column header of this estimator
    fn name(&self) -> &'static str;

    /// Footnote describing the tuning constants
    fn description(&self) -> String;

    /// `ψ(u)/u` for a standardized residual `u`
    fn weight(&self, u: f64) -> f64;
}

/// Huber's monotone ψ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Huber {
    pub k: f64,
}

impl Default for Huber {
    fn default() -> Self {
        Self { k: HUBER_K }
    }
}

impl PsiFunction for Huber {
    fn name(&self) -> &'static str {
        "Huber's M-Estimator"
    }

    fn description(&self) -> String {
        format!("The weighting constant is {:.3}.", self.k)
    }

    fn weight(&self, u: f64) -> f64 {
        let a = u.abs();
        if a <= self.k {
            1.0
        } else {
            self.k / a
        }
    }
}

/// Tukey's biweight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TukeyBiweight {
    pub c: f64,
}

impl Default for TukeyBiweight {
    fn default() -> Self {
        Self { c: TUKEY_C }
    }
}

impl PsiFunction for TukeyBiweight {
    fn name(&self) -> &'static str {
        "Tukey's Biweight"
    }

    fn description(&self) -> String {
        format!("The weighting constant is {:.3}.", self.c)
    }

    fn weight(&self, u: f64) -> f64 {
        if u.abs() > self.c {
            return 0.0;
        }
        let r = u / self.c;
        let t = 1.0 - r * r;
        t * t
    }
}

/// Hampel's three-part redescending ψ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hampel {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for Hampel {
    fn default() -> Self {
        Self {
            a: HAMPEL_A,
            b: HAMPEL_B,
            c: HAMPEL_C,
        }
    }
}

impl PsiFunction for Hampel {
    fn name(&self) -> &'static str {
        "Hampel's M-Estimator"
    }

    fn description(&self) -> String {
        format!(
            "The weighting constants are {:.3}, {:.3}, and {:.3}.",
            self.a, self.b, self.c
        )
    }

    fn weight(&self, u: f64) -> f64 {
        let a = u.abs();
        if a <= self.a {
            1.0
        } else if a <= self.b {
            self.a / a
        } else if a <= self.c {
            self.a * (self.c - a) / ((self.c - self.b) * a)
        } else {
            0.0
        }
    }
}

/// Andrews' sine wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AndrewsWave {
    pub c: f64,
}

impl Default for AndrewsWave {
    fn default() -> Self {
        Self { c: ANDREWS_C }
    }
}

impl PsiFunction for AndrewsWave {
    fn name(&self) -> &'static str {
        "Andrews' Wave"
    }

    fn description(&self) -> String {
        format!("The weighting constant is {:.3}*pi.", self.c)
    }

    fn weight(&self, u: f64) -> f64 {
        let z = u / self.c;
        if z == 0.0 {
            1.0
        } else if z.abs() <= std::f64::consts::PI {
            z.sin() / z
        } else {
            0.0
        }
    }
}

/// The four estimators of the M-Estimators table, in column order
pub fn standard_estimators() -> Vec<Box<dyn PsiFunction>> {
    vec![
        Box::new(Huber::default()),
        Box::new(TukeyBiweight::default()),
        Box::new(Hampel::default()),
        Box::new(AndrewsWave::default()),
    ]
}

/// Median and the MAD-based scale shared by every estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustStart {
    pub median: f64,
    /// `MAD / 0.6745`
    pub scale: f64,
}

impl RobustStart {
    pub fn compute(values: &[f64], weights: &[f64]) -> Option<Self> {
        let median = WeightedSample::new(values, Some(weights)).median()?;
        let deviations: Vec<f64> = values.iter().map(|x| (x - median).abs()).collect();
        let mad = WeightedSample::new(&deviations, Some(weights)).median()?;
        Some(Self {
            median,
            scale: mad / MAD_NORMAL,
        })
    }
}

/// Iteratively reweighted location estimate
pub fn m_estimate(psi: &dyn PsiFunction, values: &[f64], weights: &[f64], start: RobustStart) -> f64 {
    let scale = start.scale;
    if scale <= 0.0 || !scale.is_finite() {
        return start.median;
    }
    let mut estimate = start.median;
    for _ in 0..MAX_ITERATIONS {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (&x, &w) in values.iter().zip(weights) {
            let rw = w * psi.weight((x - estimate) / scale);
            weighted_sum += rw * x;
            weight_total += rw;
        }
        if weight_total <= 0.0 {
            break;
        }
        let next = weighted_sum / weight_total;
        let delta = (next - estimate).abs();
        estimate = next;
        if delta <= TOLERANCE * scale {
            break;
        }
    }
    estimate
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ones(n: usize) -> Vec<f64> {
        vec![1.0; n]
    }

    #[test]
    fn test_weight_functions() {
        let huber = Huber::default();
        assert_eq!(huber.weight(0.5), 1.0);
        assert_relative_eq!(huber.weight(2.678), 0.5, epsilon = 1e-12);

        let tukey = TukeyBiweight::default();
        assert_eq!(tukey.weight(0.0), 1.0);
        assert_eq!(tukey.weight(5.0), 0.0);

        let hampel = Hampel::default();
        assert_eq!(hampel.weight(1.0), 1.0);
        assert_relative_eq!(hampel.weight(3.4), 0.5, epsilon = 1e-12);
        assert_relative_eq!(hampel.weight(8.5), 0.0, epsilon = 1e-12);
        assert_eq!(hampel.weight(9.0), 0.0);

        let andrews = AndrewsWave::default();
        assert_eq!(andrews.weight(0.0), 1.0);
        assert_eq!(andrews.weight(1.34 * 4.0), 0.0);
        assert!(andrews.weight(1.0) < 1.0);
    }

    #[test]
    fn test_symmetric_sample_stays_at_center() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let start = RobustStart::compute(&values, &ones(5)).unwrap();
        assert_eq!(start.median, 3.0);
        for psi in standard_estimators() {
            assert_relative_eq!(m_estimate(psi.as_ref(), &values, &ones(5), start), 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_outlier_resistance() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let start = RobustStart::compute(&values, &ones(6)).unwrap();
        let mean = values.iter().sum::<f64>() / 6.0;
        for psi in standard_estimators() {
            let m = m_estimate(psi.as_ref(), &values, &ones(6), start);
            assert!(m > 2.0 && m < 5.0, "{} = {m}", psi.name());
            assert!(m < mean);
        }
        // redescending estimators drop the outlier entirely
        let tukey = m_estimate(&TukeyBiweight::default(), &values, &ones(6), start);
        assert_relative_eq!(tukey, 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_scale_returns_median() {
        let values = [2.0, 2.0, 2.0, 2.0, 9.0];
        let start = RobustStart::compute(&values, &ones(5)).unwrap();
        assert_eq!(start.scale, 0.0);
        assert_eq!(m_estimate(&Huber::default(), &values, &ones(5), start), 2.0);
    }

    #[test]
    fn test_empty_has_no_start() {
        assert!(RobustStart::compute(&[], &[]).is_none());
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(Huber::default().description(), "The weighting constant is 1.339.");
        assert_eq!(AndrewsWave::default().description(), "The weighting constant is 1.340*pi.");
        assert_eq!(
            Hampel::default().description(),
            "The weighting constants are 1.700, 3.400, and 8.500."
        );
    }
}
