//! Chi-square family tests and symmetric association measures
//!
//! Asymptotic significances are upper tails of the chi-square distribution.
//! Every function returns `None` when its statistic is not defined for the
//! table: no valid cases, a constant axis, or the wrong shape.

use crate::contingency::Contingency;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::factorial::ln_binomial;

/// Relative slack when comparing hypergeometric probabilities
const FISHER_TOLERANCE: f64 = 1e-7;

/// A chi-square distributed statistic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareTest {
    pub value: f64,
    pub df: f64,
    /// Asymptotic two-sided significance
    pub significance: Option<f64>,
}

impl ChiSquareTest {
    fn new(value: f64, df: f64) -> Self {
        Self {
            value,
            df,
            significance: upper_tail(value, df),
        }
    }
}

/// `P(X ≥ x)` for `X ~ χ²(df)`
pub fn upper_tail(x: f64, df: f64) -> Option<f64> {
    if df.is_nan() || df <= 0.0 || !x.is_finite() {
        return None;
    }
    let dist = ChiSquared::new(df).ok()?;
    Some((1.0 - dist.cdf(x.max(0.0))).clamp(0.0, 1.0))
}

fn testable(table: &Contingency) -> bool {
    !table.is_empty() && table.has_variation()
}

/// Pearson `Σ (O − E)² / E` over cells with `E > 0`
pub fn pearson(table: &Contingency) -> Option<ChiSquareTest> {
    if !testable(table) {
        return None;
    }
    let value = table
        .cells()
        .filter_map(|(i, j)| {
            let e = table.expected(i, j);
            (e > 0.0).then(|| table.residual(i, j).powi(2) / e)
        })
        .sum();
    Some(ChiSquareTest::new(value, table.degrees_of_freedom() as f64))
}

/// Likelihood ratio `G² = 2 Σ O ln(O / E)`; empty cells contribute nothing
pub fn likelihood_ratio(table: &Contingency) -> Option<ChiSquareTest> {
    if !testable(table) {
        return None;
    }
    let sum: f64 = table
        .cells()
        .filter_map(|(i, j)| {
            let (o, e) = (table.counts[i][j], table.expected(i, j));
            (o > 0.0 && e > 0.0).then(|| o * (o / e).ln())
        })
        .sum();
    Some(ChiSquareTest::new(2.0 * sum, table.degrees_of_freedom() as f64))
}

/// Yates-corrected Pearson statistic, 2x2 tables only
pub fn continuity_correction(table: &Contingency) -> Option<ChiSquareTest> {
    if !testable(table) || !table.is_2x2() {
        return None;
    }
    let value = table
        .cells()
        .filter_map(|(i, j)| {
            let e = table.expected(i, j);
            (e > 0.0).then(|| (table.residual(i, j).abs() - 0.5).max(0.0).powi(2) / e)
        })
        .sum();
    Some(ChiSquareTest::new(value, 1.0))
}

/// Mantel-Haenszel `(N − 1) r²` with the category values as scores
///
/// `None` unless both axes are numeric and both have spread.
pub fn linear_by_linear(table: &Contingency) -> Option<ChiSquareTest> {
    if !testable(table) {
        return None;
    }
    let u: Vec<f64> = table.row_keys.iter().map(|k| k.as_number()).collect::<Option<_>>()?;
    let v: Vec<f64> = table.col_keys.iter().map(|k| k.as_number()).collect::<Option<_>>()?;
    let n = table.total;
    let u_mean = u.iter().zip(&table.row_totals).map(|(x, w)| x * w).sum::<f64>() / n;
    let v_mean = v.iter().zip(&table.col_totals).map(|(x, w)| x * w).sum::<f64>() / n;

    let u_ss: f64 = u.iter().zip(&table.row_totals).map(|(x, w)| w * (x - u_mean).powi(2)).sum();
    let v_ss: f64 = v.iter().zip(&table.col_totals).map(|(x, w)| w * (x - v_mean).powi(2)).sum();
    if u_ss <= 0.0 || v_ss <= 0.0 {
        return None;
    }
    let cross: f64 = table
        .cells()
        .map(|(i, j)| table.counts[i][j] * (u[i] - u_mean) * (v[j] - v_mean))
        .sum();
    let r = cross / (u_ss * v_ss).sqrt();
    Some(ChiSquareTest::new((n - 1.0) * r * r, 1.0))
}

/// Exact significances of Fisher's test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisherExact {
    pub two_sided: f64,
    /// The smaller tail in the direction of the observed table
    pub one_sided: f64,
}

/// Fisher's exact test for a 2x2 table of whole-number counts
pub fn fisher_exact(table: &Contingency) -> Option<FisherExact> {
    if !testable(table) || !table.is_2x2() {
        return None;
    }
    let whole = |x: f64| (x >= 0.0 && x.fract() == 0.0).then_some(x as u64);
    let a = whole(table.counts[0][0])?;
    let r1 = whole(table.row_totals[0])?;
    let c1 = whole(table.col_totals[0])?;
    let n = whole(table.total)?;
    for (i, j) in table.cells() {
        whole(table.counts[i][j])?;
    }

    let denominator = ln_binomial(n, c1);
    let p = |x: u64| (ln_binomial(r1, x) + ln_binomial(n - r1, c1 - x) - denominator).exp();
    let lo = (r1 + c1).saturating_sub(n);
    let hi = r1.min(c1);
    let observed = p(a);

    let (mut two_sided, mut left, mut right) = (0.0, 0.0, 0.0);
    for x in lo..=hi {
        let px = p(x);
        if px <= observed * (1.0 + FISHER_TOLERANCE) {
            two_sided += px;
        }
        if x <= a {
            left += px;
        }
        if x >= a {
            right += px;
        }
    }
    Some(FisherExact {
        two_sided: two_sided.min(1.0),
        one_sided: left.min(right).min(1.0),
    })
}

/// Nominal-by-nominal measures derived from Pearson's statistic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricMeasures {
    /// Signed by `ad − bc` for 2x2 tables
    pub phi: f64,
    pub cramers_v: f64,
    pub contingency_coefficient: f64,
    /// Shared approximate significance
    pub significance: Option<f64>,
}

pub fn symmetric_measures(table: &Contingency) -> Option<SymmetricMeasures> {
    let chi = pearson(table)?;
    let n = table.total;
    let k = table.n_rows().min(table.n_cols()) as f64;
    let mut phi = (chi.value / n).sqrt();
    if table.is_2x2() {
        let c = &table.counts;
        if c[0][0] * c[1][1] - c[0][1] * c[1][0] < 0.0 {
            phi = -phi;
        }
    }
    Some(SymmetricMeasures {
        phi,
        cramers_v: (chi.value / (n * (k - 1.0))).sqrt(),
        contingency_coefficient: (chi.value / (chi.value + n)).sqrt(),
        significance: chi.significance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tabstat_core::ValueKey;

    /// Expand a matrix of whole counts into aligned case keys
    fn table(counts: &[&[usize]]) -> Contingency {
        let (mut rows, mut cols) = (Vec::new(), Vec::new());
        for (i, row) in counts.iter().enumerate() {
            for (j, &n) in row.iter().enumerate() {
                for _ in 0..n {
                    rows.push(ValueKey::number(i as f64 + 1.0));
                    cols.push(ValueKey::number(j as f64 + 1.0));
                }
            }
        }
        let weights = vec![1.0; rows.len()];
        Contingency::build(&rows, &cols, &weights)
    }

    #[test]
    fn test_independent_table() {
        let t = table(&[&[1, 1], &[1, 1]]);
        let chi = pearson(&t).unwrap();
        assert_eq!(chi.value, 0.0);
        assert_eq!(chi.df, 1.0);
        assert_relative_eq!(chi.significance.unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(continuity_correction(&t).unwrap().value, 0.0);
        assert_eq!(likelihood_ratio(&t).unwrap().value, 0.0);
        let fisher = fisher_exact(&t).unwrap();
        assert_relative_eq!(fisher.two_sided, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fisher.one_sided, 5.0 / 6.0, epsilon = 1e-12);
        assert_eq!(symmetric_measures(&t).unwrap().phi, 0.0);
    }

    #[test]
    fn test_reference_two_by_two() {
        let t = table(&[&[10, 20], &[30, 40]]);
        let chi = pearson(&t).unwrap();
        assert_relative_eq!(chi.value, 0.793_650_793_650_793_6, epsilon = 1e-12);
        assert_relative_eq!(chi.significance.unwrap(), 0.372_998_483_613_487, epsilon = 1e-6);
        assert_relative_eq!(continuity_correction(&t).unwrap().value, 0.446_428_571_428_571_4, epsilon = 1e-12);
        assert_relative_eq!(likelihood_ratio(&t).unwrap().value, 0.804_348_646_096_483_5, epsilon = 1e-10);

        let fisher = fisher_exact(&t).unwrap();
        assert_relative_eq!(fisher.two_sided, 0.504_475_769_851_628, epsilon = 1e-9);
        assert_relative_eq!(fisher.one_sided, 0.253_331_071_361_755_7, epsilon = 1e-9);

        let m = symmetric_measures(&t).unwrap();
        assert_relative_eq!(m.phi, -0.089_087_080_637_474_8, epsilon = 1e-12);
        assert_relative_eq!(m.cramers_v, 0.089_087_080_637_474_8, epsilon = 1e-12);
        assert_relative_eq!(m.contingency_coefficient, 0.088_735_650_941_611_37, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_by_linear() {
        let perfect = table(&[&[2, 0], &[0, 2]]);
        assert_relative_eq!(linear_by_linear(&perfect).unwrap().value, 3.0, epsilon = 1e-12);
        let flat = table(&[&[1, 1], &[1, 1]]);
        assert_relative_eq!(linear_by_linear(&flat).unwrap().value, 0.0, epsilon = 1e-12);

        let rows = vec![ValueKey::text("a"), ValueKey::text("b")];
        let cols = vec![ValueKey::number(1.0), ValueKey::number(2.0)];
        let text = Contingency::build(&rows, &cols, &[1.0, 1.0]);
        assert!(linear_by_linear(&text).is_none());
    }

    #[test]
    fn test_larger_table_has_no_exact_test() {
        let t = table(&[&[3, 1, 2], &[1, 4, 2]]);
        assert_eq!(pearson(&t).unwrap().df, 2.0);
        assert!(fisher_exact(&t).is_none());
        assert!(continuity_correction(&t).is_none());
        let m = symmetric_measures(&t).unwrap();
        assert!(m.phi >= 0.0);
        assert_relative_eq!(m.phi, m.cramers_v, epsilon = 1e-12);
    }

    #[test]
    fn test_fractional_weights_skip_fisher() {
        let rows = [1.0, 1.0, 2.0, 2.0].map(ValueKey::number);
        let cols = [1.0, 2.0, 1.0, 2.0].map(ValueKey::number);
        let t = Contingency::build(&rows, &cols, &[1.5, 1.0, 1.0, 1.0]);
        assert!(fisher_exact(&t).is_none());
        assert!(pearson(&t).is_some());
    }

    #[test]
    fn test_constant_axis_is_not_testable() {
        let t = table(&[&[2, 3]]);
        assert!(pearson(&t).is_none());
        assert!(symmetric_measures(&t).is_none());
        assert!(upper_tail(1.0, 0.0).is_none());
    }
}
