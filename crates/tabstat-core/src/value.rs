//! Raw cell values and category keys
//!
//! Cells are classified once, at the boundary, into a tagged union so the
//! calculators never sniff types mid-algorithm.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw cell as delivered by the slicing stage
///
/// Deserializes from a JSON number, a JSON string, or `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl CellValue {
    /// Interpret the cell as a finite number, parsing numeric text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Interpret the cell as text, with trailing blanks removed
    ///
    /// Blank strings are `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(v.to_string()),
            CellValue::Text(s) => {
                let trimmed = s.trim_end();
                if trimmed.trim_start().is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            _ => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Missing, Into::into)
    }
}

/// Hashable, totally ordered key for a distinct valid value
///
/// Numbers order before strings; strings order byte-wise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl ValueKey {
    /// Key for a finite number; `-0.0` collapses onto `0.0`
    pub fn number(v: f64) -> Self {
        let v = if v == 0.0 { 0.0 } else { v };
        ValueKey::Number(OrderedFloat(v))
    }

    pub fn text(s: impl Into<String>) -> Self {
        ValueKey::Text(s.into())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ValueKey::Number(v) => Some(v.0),
            ValueKey::Text(_) => None,
        }
    }

    /// Does this key denote the same value as a raw cell?
    pub fn matches(&self, cell: &CellValue) -> bool {
        match self {
            ValueKey::Number(v) => cell.as_number().is_some_and(|c| c == v.0),
            ValueKey::Text(s) => cell.as_text().is_some_and(|c| c == *s),
        }
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Shortest round-trip representation: 3.0 prints as "3"
            ValueKey::Number(v) => write!(f, "{}", v.0),
            ValueKey::Text(s) => f.write_str(s),
        }
    }
}
