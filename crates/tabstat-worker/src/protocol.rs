//! JSON request and response messages
//!
//! ```json
//! {"kind": "frequency", "variable": {...}, "data": [...], "options": {...}}
//! {"status": "success", "variableName": "x", "results": {"tables": [...]}}
//! {"status": "error", "variableName": "x", "error": "..."}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabstat_core::{CalculatorKind, ResultBundle};
use tabstat_crosstabs::CrosstabsRequest;
use tabstat_descriptive::DescriptiveRequest;
use tabstat_examine::ExamineRequest;
use tabstat_frequency::FrequencyRequest;

/// One computation request, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Request {
    Frequency(FrequencyRequest),
    Descriptive(DescriptiveRequest),
    Examine(ExamineRequest),
    Crosstabs(CrosstabsRequest),
}

impl Request {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            Request::Frequency(_) => CalculatorKind::Frequency,
            Request::Descriptive(_) => CalculatorKind::Descriptive,
            Request::Examine(_) => CalculatorKind::Examine,
            Request::Crosstabs(_) => CalculatorKind::Crosstabs,
        }
    }

    /// Key of this request's response
    pub fn variable_name(&self) -> String {
        match self {
            Request::Frequency(r) => r.variable.name.clone(),
            Request::Descriptive(r) => r.variable.name.clone(),
            Request::Examine(r) => r.variable.name.clone(),
            Request::Crosstabs(r) => r.name(),
        }
    }
}

/// Best-effort variable name of a request that may not parse
///
/// Returns `""` when the name cannot be found.
pub fn recover_variable_name(value: &Value) -> String {
    let variable = &value["variable"];
    let name = |v: &Value| v["name"].as_str().map(str::to_string);
    let crosstab = name(&variable["row"]).zip(name(&variable["col"]));
    match (value["kind"].as_str(), crosstab) {
        (Some("crosstabs"), Some((row, col))) => format!("{row} * {col}"),
        _ => name(variable).unwrap_or_default(),
    }
}

/// Exactly one response per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Success {
        #[serde(rename = "variableName")]
        variable_name: String,
        results: ResultBundle,
    },
    Error {
        #[serde(rename = "variableName")]
        variable_name: String,
        error: String,
    },
}

impl Response {
    pub fn success(variable_name: impl Into<String>, results: ResultBundle) -> Self {
        Response::Success {
            variable_name: variable_name.into(),
            results,
        }
    }

    pub fn error(variable_name: impl Into<String>, error: impl ToString) -> Self {
        Response::Error {
            variable_name: variable_name.into(),
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    pub fn variable_name(&self) -> &str {
        match self {
            Response::Success { variable_name, .. } | Response::Error { variable_name, .. } => variable_name,
        }
    }

    pub fn results(&self) -> Option<&ResultBundle> {
        match self {
            Response::Success { results, .. } => Some(results),
            Response::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Response::Error { error, .. } => Some(error),
            Response::Success { .. } => None,
        }
    }
}
