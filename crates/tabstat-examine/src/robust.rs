//! Trimmed mean and Tukey's hinges on a weighted sample

use tabstat_frequency::WeightedSample;

/// Mean of the central `1 − 2α` share of the total weight
///
/// Each distinct value occupies the weight interval `[cc_{k−1}, cc_k]`; only
/// the part inside `[αW, (1−α)W]` contributes.
pub fn trimmed_mean(sample: &WeightedSample, alpha: f64) -> Option<f64> {
    if sample.is_empty() || !(0.0..0.5).contains(&alpha) {
        return None;
    }
    let w = sample.total_weight();
    let (lo, hi) = (alpha * w, (1.0 - alpha) * w);
    let mut sum = 0.0;
    let mut kept = 0.0;
    let mut start: f64 = 0.0;
    for (&x, &end) in sample.values().iter().zip(sample.cumulative()) {
        let overlap = (end.min(hi) - start.max(lo)).max(0.0);
        sum += overlap * x;
        kept += overlap;
        start = end;
    }
    (kept > 0.0).then(|| sum / kept)
}

/// Tukey's lower hinge, median and upper hinge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hinges {
    pub lower: f64,
    pub median: f64,
    pub upper: f64,
}

impl Hinges {
    /// Depth `(⌊(W+1)/2⌋ + 1) / 2` from each end
    pub fn compute(sample: &WeightedSample) -> Option<Self> {
        let w = sample.total_weight();
        if sample.is_empty() || w <= 0.0 {
            return None;
        }
        let depth = (((w + 1.0) / 2.0).floor() + 1.0) / 2.0;
        Some(Self {
            lower: sample.at_position(depth)?,
            median: sample.at_position((w + 1.0) / 2.0)?,
            upper: sample.at_position(w + 1.0 - depth)?,
        })
    }

    pub fn spread(&self) -> f64 {
        self.upper - self.lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trimmed_mean_one_to_five() {
        let s = WeightedSample::new(&[1.0, 2.0, 3.0, 4.0, 5.0], None);
        assert_relative_eq!(trimmed_mean(&s, 0.05).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(trimmed_mean(&s, 0.0).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trimmed_mean_drops_tail_weight() {
        // W = 10, α = 0.1 trims one unit of weight from each end
        let s = WeightedSample::new(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0], None);
        assert_relative_eq!(trimmed_mean(&s, 0.1).unwrap(), 4.5, epsilon = 1e-12);
    }

    #[test]
    fn test_trimmed_mean_weighted_matches_replicated() {
        let weighted = WeightedSample::new(&[1.0, 2.0, 9.0], Some(&[2.0, 3.0, 1.0]));
        let replicated = WeightedSample::new(&[1.0, 1.0, 2.0, 2.0, 2.0, 9.0], None);
        assert_relative_eq!(
            trimmed_mean(&weighted, 0.2).unwrap(),
            trimmed_mean(&replicated, 0.2).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_trimmed_mean_degenerate() {
        assert!(trimmed_mean(&WeightedSample::new(&[], None), 0.05).is_none());
        assert_eq!(trimmed_mean(&WeightedSample::new(&[4.0], None), 0.05), Some(4.0));
    }

    #[test]
    fn test_hinges() {
        let odd = Hinges::compute(&WeightedSample::new(&[1.0, 2.0, 3.0, 4.0, 5.0], None)).unwrap();
        assert_eq!((odd.lower, odd.median, odd.upper), (2.0, 3.0, 4.0));

        let even = Hinges::compute(&WeightedSample::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], None)).unwrap();
        assert_eq!((even.lower, even.median, even.upper), (2.0, 3.5, 5.0));

        let four = Hinges::compute(&WeightedSample::new(&[1.0, 2.0, 3.0, 4.0], None)).unwrap();
        assert_eq!((four.lower, four.upper), (1.5, 3.5));
        assert_eq!(four.spread(), 2.0);

        assert!(Hinges::compute(&WeightedSample::new(&[], None)).is_none());
    }
}
