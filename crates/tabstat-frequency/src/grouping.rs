//! Distinct-value grouping and category ordering

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tabstat_core::{Measure, ValueKey};

/// Order of categories in a frequency table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Numbers ascending, then strings byte-wise
    #[default]
    AscendingValues,
    DescendingValues,
    /// By weighted count, ties by ascending value
    AscendingCounts,
    /// By weighted count, ties by ascending value
    DescendingCounts,
    /// First appearance in case order
    FirstSeen,
}

impl SortOrder {
    /// Default order for a level of measurement
    pub fn default_for(measure: Measure) -> Self {
        match measure {
            Measure::Nominal => SortOrder::FirstSeen,
            _ => SortOrder::AscendingValues,
        }
    }
}

/// One distinct value with its accumulated counts
#[derive(Debug, Clone, PartialEq)]
pub struct ValueGroup {
    pub key: ValueKey,
    /// Number of cases
    pub count: usize,
    /// Sum of case weights
    pub weighted_count: f64,
    /// Index of the first case holding this value
    pub first_seen: usize,
}

/// Group keys into distinct values, in first-seen order
///
/// Weights are accumulated in case order so the sums do not depend on any
/// hashing.
pub fn group_values(keys: &[ValueKey], weights: &[f64]) -> Vec<ValueGroup> {
    debug_assert_eq!(keys.len(), weights.len());
    let mut index: BTreeMap<&ValueKey, usize> = BTreeMap::new();
    let mut groups: Vec<ValueGroup> = Vec::new();
    for (i, (key, &w)) in keys.iter().zip(weights).enumerate() {
        match index.get(key) {
            Some(&g) => {
                groups[g].count += 1;
                groups[g].weighted_count += w;
            }
            None => {
                index.insert(key, groups.len());
                groups.push(ValueGroup {
                    key: key.clone(),
                    count: 1,
                    weighted_count: w,
                    first_seen: i,
                });
            }
        }
    }
    groups
}

fn by_count(a: &ValueGroup, b: &ValueGroup) -> Ordering {
    a.weighted_count
        .total_cmp(&b.weighted_count)
        .then_with(|| a.key.cmp(&b.key))
}

/// Sort groups in place according to `order`
pub fn sort_groups(groups: &mut [ValueGroup], order: SortOrder) {
    match order {
        SortOrder::AscendingValues => groups.sort_by(|a, b| a.key.cmp(&b.key)),
        SortOrder::DescendingValues => groups.sort_by(|a, b| b.key.cmp(&a.key)),
        SortOrder::AscendingCounts => groups.sort_by(by_count),
        SortOrder::DescendingCounts => groups.sort_by(|a, b| {
            b.weighted_count
                .total_cmp(&a.weighted_count)
                .then_with(|| a.key.cmp(&b.key))
        }),
        SortOrder::FirstSeen => groups.sort_by_key(|g| g.first_seen),
    }
}

/// Distinct values in ascending order
pub fn distinct_sorted(keys: &[ValueKey], weights: &[f64]) -> Vec<ValueGroup> {
    let mut groups = group_values(keys, weights);
    sort_groups(&mut groups, SortOrder::AscendingValues);
    groups
}
