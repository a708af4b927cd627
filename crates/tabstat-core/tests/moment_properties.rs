//! Property-based tests for the weighted primitives
//!
//! Frequency weights must behave like case replication, and the variance
//! must follow the location/scale laws for any sample.

mod common;

use common::*;
use proptest::prelude::*;
use tabstat_core::{get_valid_data, Moments, ScalarPrimitives, StatPrimitives, Variable};

fn sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1_000.0f64..1_000.0, 2..60)
}

proptest! {
    #[test]
    fn prop_unit_weights_match_unweighted(values in sample()) {
        let p = ScalarPrimitives::new();
        let ones = vec![1.0; values.len()];
        let weighted = p.weighted_mean(&values, Some(&ones)).unwrap();
        let plain = p.weighted_mean(&values, None).unwrap();
        prop_assert!((weighted - plain).abs() <= 1e-9 * (1.0 + plain.abs()));

        let wv = p.weighted_variance(&values, Some(&ones)).unwrap();
        let pv = p.weighted_variance(&values, None).unwrap();
        prop_assert!((wv - pv).abs() <= 1e-9 * (1.0 + pv.abs()));
    }

    #[test]
    fn prop_variance_shift_invariant(values in sample(), shift in -500.0f64..500.0) {
        let p = ScalarPrimitives::new();
        let shifted: Vec<f64> = values.iter().map(|x| x + shift).collect();
        let a = p.weighted_variance(&values, None).unwrap();
        let b = p.weighted_variance(&shifted, None).unwrap();
        prop_assert!((a - b).abs() <= 1e-6 * (1.0 + a.abs()));
    }

    #[test]
    fn prop_variance_scale_law(values in sample(), scale in -20.0f64..20.0) {
        let p = ScalarPrimitives::new();
        let scaled: Vec<f64> = values.iter().map(|x| x * scale).collect();
        let a = p.weighted_variance(&values, None).unwrap();
        let b = p.weighted_variance(&scaled, None).unwrap();
        let expected = scale * scale * a;
        prop_assert!((b - expected).abs() <= 1e-8 * (1.0 + expected.abs()));
    }

    #[test]
    fn prop_integer_weights_match_replication(
        pairs in prop::collection::vec((-100.0f64..100.0, 1u32..5), 4..30)
    ) {
        let values: Vec<f64> = pairs.iter().map(|(v, _)| *v).collect();
        let counts: Vec<u32> = pairs.iter().map(|(_, w)| *w).collect();
        let weights: Vec<f64> = counts.iter().map(|&w| w as f64).collect();
        let replicated = replicate(&values, &counts);

        let w = Moments::compute(&values, Some(&weights)).unwrap();
        let r = Moments::compute(&replicated, None).unwrap();
        prop_assert!((w.mean - r.mean).abs() <= 1e-9 * (1.0 + r.mean.abs()));
        let (wv, rv) = (w.variance().unwrap(), r.variance().unwrap());
        prop_assert!((wv - rv).abs() <= 1e-7 * (1.0 + rv.abs()));
    }
}

#[test]
fn test_filtering_then_moments() {
    let var = Variable::numeric("x");
    let data = numeric_column(&[Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
    let valid = get_valid_data(&var, &data, None).unwrap();
    let m = ScalarPrimitives::new()
        .moments(&valid.numbers(), Some(&valid.weights))
        .unwrap();
    assert_relative_eq!(m.mean, 3.0, epsilon = EPSILON);
    assert_relative_eq!(m.variance().unwrap(), 2.5, epsilon = EPSILON);
    assert_eq!(valid.summary.missing(), 1);
}
