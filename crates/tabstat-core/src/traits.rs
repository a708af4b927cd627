//! Calculator traits shared by every procedure crate

use crate::error::Result;
use crate::table::ResultBundle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The procedures the engine can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorKind {
    Frequency,
    Descriptive,
    Examine,
    Crosstabs,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 4] = [
        CalculatorKind::Frequency,
        CalculatorKind::Descriptive,
        CalculatorKind::Examine,
        CalculatorKind::Crosstabs,
    ];

    /// Wire name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            CalculatorKind::Frequency => "frequency",
            CalculatorKind::Descriptive => "descriptive",
            CalculatorKind::Examine => "examine",
            CalculatorKind::Crosstabs => "crosstabs",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A procedure turning one request into a result bundle
///
/// Implementations hold no per-request state: `compute` takes `&self` and
/// borrows the request, so the same calculator can serve many requests and
/// the caller's columns are never modified.
pub trait Calculator {
    /// Request payload this calculator understands
    type Request;

    fn kind(&self) -> CalculatorKind;

    /// Identity of the analysed variable(s), echoed in responses
    fn variable_name(&self, request: &Self::Request) -> String;

    fn compute(&self, request: &Self::Request) -> Result<ResultBundle>;
}
