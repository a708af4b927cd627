//! Validity filtering of raw columns
//!
//! A case is valid when its value is a finite number (numeric variables) or a
//! non-blank string (string variables), is not declared missing, and carries a
//! usable weight. Cases whose weight is not a finite positive number are
//! dropped entirely: they are neither valid nor missing.

use crate::error::{check_len, Result};
use crate::value::{CellValue, ValueKey};
use crate::variable::{Classified, Variable};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

/// True iff `v` is a finite number
#[inline]
pub fn is_valid_number(v: f64) -> bool {
    v.is_finite()
}

/// True iff `w` can weight a case
#[inline]
pub fn is_usable_weight(w: f64) -> bool {
    w.is_finite() && w > 0.0
}

/// Case counts for one procedure
///
/// Counts are raw cases; the `*_weight` fields are the matching weighted
/// totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub valid: usize,
    pub valid_weight: f64,
    pub user_missing: usize,
    pub user_missing_weight: f64,
    pub system_missing: usize,
    pub system_missing_weight: f64,
    pub excluded_by_weight: usize,
}

impl CaseSummary {
    pub fn missing(&self) -> usize {
        self.user_missing + self.system_missing
    }

    pub fn missing_weight(&self) -> f64 {
        self.user_missing_weight + self.system_missing_weight
    }

    /// Cases taking part in the procedure, valid or missing
    pub fn total(&self) -> usize {
        self.valid + self.missing()
    }

    /// Total weight including missing cases
    pub fn total_weight(&self) -> f64 {
        self.valid_weight + self.missing_weight()
    }

    fn record_user_missing(&mut self, weight: f64) {
        self.user_missing += 1;
        self.user_missing_weight += weight;
    }

    fn record_system_missing(&mut self, weight: f64) {
        self.system_missing += 1;
        self.system_missing_weight += weight;
    }

    fn record_valid(&mut self, weight: f64) {
        self.valid += 1;
        self.valid_weight += weight;
    }
}

/// A column reduced to its valid cases
#[derive(Debug, Clone, Default)]
pub struct ValidData {
    /// Valid values in case order
    pub keys: Vec<ValueKey>,
    /// Weight of each valid value
    pub weights: Vec<f64>,
    /// Original position of each valid value in the raw column
    pub positions: Vec<usize>,
    /// User-missing values in case order, with their weights
    pub user_missing: Vec<(ValueKey, f64)>,
    pub summary: CaseSummary,
}

impl ValidData {
    /// Numeric view of the valid values (empty for string variables)
    pub fn numbers(&self) -> Vec<f64> {
        self.keys.iter().filter_map(ValueKey::as_number).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Check that the optional weight column lines up with the data
pub fn check_weights(data_len: usize, weights: Option<&[f64]>) -> Result<()> {
    match weights {
        Some(w) => check_len(data_len, w.len(), "weight vector"),
        None => Ok(()),
    }
}

#[inline]
fn weight_at(weights: Option<&[f64]>, i: usize) -> f64 {
    weights.map_or(1.0, |w| w[i])
}

/// Reduce one raw column to its valid `(value, weight)` pairs
///
/// The input slices are borrowed, never modified.
pub fn get_valid_data(
    variable: &Variable,
    data: &[CellValue],
    weights: Option<&[f64]>,
) -> Result<ValidData> {
    check_weights(data.len(), weights)?;

    let mut out = ValidData::default();
    for (i, cell) in data.iter().enumerate() {
        let w = weight_at(weights, i);
        if !is_usable_weight(w) {
            out.summary.excluded_by_weight += 1;
            continue;
        }
        match variable.classify(cell) {
            Classified::Valid(key) => {
                out.summary.record_valid(w);
                out.keys.push(key);
                out.weights.push(w);
                out.positions.push(i);
            }
            Classified::UserMissing(key) => {
                out.summary.record_user_missing(w);
                out.user_missing.push((key, w));
            }
            Classified::SystemMissing => out.summary.record_system_missing(w),
        }
    }

    trace!(
        variable = %variable.name,
        valid = out.summary.valid,
        missing = out.summary.missing(),
        excluded = out.summary.excluded_by_weight,
        "filtered column"
    );
    Ok(out)
}

/// Several columns reduced to the cases valid in all of them
#[derive(Debug, Clone, Default)]
pub struct ListwiseData {
    /// One key vector per column, aligned by case
    pub columns: Vec<Vec<ValueKey>>,
    pub weights: Vec<f64>,
    pub positions: Vec<usize>,
    /// A case missing in any column counts once as missing; system-missing
    /// takes precedence over user-missing
    pub summary: CaseSummary,
}

/// Listwise deletion across aligned columns
pub fn get_listwise_data(
    columns: &[(&Variable, &[CellValue])],
    weights: Option<&[f64]>,
) -> Result<ListwiseData> {
    let n = columns.first().map_or(0, |(_, data)| data.len());
    for (variable, data) in columns {
        check_len(n, data.len(), &format!("column '{}'", variable.name))?;
    }
    check_weights(n, weights)?;

    let mut out = ListwiseData {
        columns: vec![Vec::new(); columns.len()],
        ..Default::default()
    };
    let mut row = Vec::with_capacity(columns.len());
    for i in 0..n {
        let w = weight_at(weights, i);
        if !is_usable_weight(w) {
            out.summary.excluded_by_weight += 1;
            continue;
        }
        row.clear();
        let mut system_missing = false;
        let mut user_missing = false;
        for (variable, data) in columns {
            match variable.classify(&data[i]) {
                Classified::Valid(key) => row.push(key),
                Classified::UserMissing(_) => user_missing = true,
                Classified::SystemMissing => system_missing = true,
            }
        }
        if system_missing {
            out.summary.record_system_missing(w);
        } else if user_missing {
            out.summary.record_user_missing(w);
        } else {
            out.summary.record_valid(w);
            for (col, key) in out.columns.iter_mut().zip(row.drain(..)) {
                col.push(key);
            }
            out.weights.push(w);
            out.positions.push(i);
        }
    }
    Ok(out)
}

/// Deserialize a weight column, mapping `null` entries to NaN
///
/// NaN weights are unusable and exclude their case.
pub fn deserialize_weights<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<f64>>>::deserialize(deserializer)?;
    Ok(raw.map(|ws| ws.into_iter().map(|w| w.unwrap_or(f64::NAN)).collect()))
}
