//! Variable descriptors and missing-value rules

use crate::value::{CellValue, ValueKey};
use serde::{Deserialize, Deserializer, Serialize};

/// Storage type of a variable
///
/// Every type except `String` is numeric-backed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    #[default]
    Numeric,
    String,
    Date,
    Dollar,
    Comma,
    Dot,
    Scientific,
    CustomCurrency,
}

/// Level of measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Scale,
    Ordinal,
    Nominal,
    #[default]
    Unknown,
}

/// Closed interval of user-missing numeric values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingRange {
    pub min: f64,
    pub max: f64,
}

impl MissingRange {
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// User-missing value declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingSpec {
    /// Explicit sentinel values
    pub discrete: Vec<CellValue>,
    /// Optional range (numeric variables only)
    pub range: Option<MissingRange>,
}

impl MissingSpec {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn discrete(values: impl IntoIterator<Item = CellValue>) -> Self {
        Self {
            discrete: values.into_iter().collect(),
            range: None,
        }
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self {
            discrete: Vec::new(),
            range: Some(MissingRange { min, max }),
        }
    }

    /// Is a valid-looking key declared missing?
    pub fn is_missing(&self, key: &ValueKey) -> bool {
        if self.discrete.iter().any(|cell| key.matches(cell)) {
            return true;
        }
        match (key, &self.range) {
            (ValueKey::Number(v), Some(range)) => range.contains(v.0),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.range.is_none()
    }
}

/// Value label attached to one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueLabel {
    pub value: CellValue,
    pub label: String,
}

/// How one raw cell is treated by a procedure
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Valid(ValueKey),
    UserMissing(ValueKey),
    SystemMissing,
}

/// Variable descriptor, read-only for the duration of a computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub column_index: usize,
    #[serde(rename = "type", default)]
    pub var_type: VariableType,
    #[serde(default)]
    pub measure: Measure,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing: MissingSpec,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<ValueLabel>,
}

fn default_decimals() -> u8 {
    2
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Variable {
    /// Numeric scale variable with no missing-value rules
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_index: 0,
            var_type: VariableType::Numeric,
            measure: Measure::Scale,
            missing: MissingSpec::none(),
            decimals: default_decimals(),
            label: None,
            values: Vec::new(),
        }
    }

    /// Nominal string variable with no missing-value rules
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            var_type: VariableType::String,
            measure: Measure::Nominal,
            decimals: 0,
            ..Self::numeric(name)
        }
    }

    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.measure = measure;
        self
    }

    pub fn with_missing(mut self, missing: MissingSpec) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value_label(mut self, value: impl Into<CellValue>, label: impl Into<String>) -> Self {
        self.values.push(ValueLabel {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.var_type != VariableType::String
    }

    /// Label if present, otherwise the name
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Decide validity of one raw cell
    pub fn classify(&self, cell: &CellValue) -> Classified {
        let key = if self.is_numeric() {
            cell.as_number().map(ValueKey::number)
        } else {
            cell.as_text().map(ValueKey::Text)
        };
        match key {
            None => Classified::SystemMissing,
            Some(key) if self.missing.is_missing(&key) => Classified::UserMissing(key),
            Some(key) => Classified::Valid(key),
        }
    }

    /// Row-header text for a category: its value label, or the value itself
    pub fn value_label(&self, key: &ValueKey) -> String {
        self.values
            .iter()
            .find(|vl| key.matches(&vl.value))
            .map(|vl| vl.label.clone())
            .unwrap_or_else(|| key.to_string())
    }
}
