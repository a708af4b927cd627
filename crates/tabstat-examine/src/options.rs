//! Request and option types for the examine procedure

use serde::{Deserialize, Serialize};
use tabstat_core::{check_len, deserialize_weights, CellValue, Error, Result, Variable};
use tabstat_frequency::{validate_percentiles, PercentileMethod};

/// Percentiles reported when none are requested
pub const DEFAULT_PERCENTILES: [f64; 7] = [5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0];

/// Which quartiles define the outlier fences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Q1/Q3 from the weighted-average percentile definition
    #[default]
    Iqr,
    /// Tukey's hinges
    Hinges,
}

/// Options of one examine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExamineOptions {
    pub percentiles: Vec<f64>,
    pub percentile_method: PercentileMethod,
    /// Percent trimmed from each tail, in `[0, 50)`
    pub trim_percent: f64,
    pub outlier_method: OutlierMethod,
    /// Cases listed at each end of the Extreme Values table
    pub extreme_count: usize,
    pub m_estimators: bool,
    /// Confidence level of the interval for the mean, in percent
    pub confidence_level: f64,
}

impl Default for ExamineOptions {
    fn default() -> Self {
        Self {
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            percentile_method: PercentileMethod::Haverage,
            trim_percent: 5.0,
            outlier_method: OutlierMethod::Iqr,
            extreme_count: 5,
            m_estimators: true,
            confidence_level: 95.0,
        }
    }
}

impl ExamineOptions {
    pub fn validate(&self) -> Result<()> {
        validate_percentiles(&self.percentiles)?;
        if !(0.0..50.0).contains(&self.trim_percent) {
            return Err(Error::invalid_option(
                "trimPercent",
                format!("{} must be in [0, 50)", self.trim_percent),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 100.0) {
            return Err(Error::invalid_option(
                "confidenceLevel",
                format!("{} must be in (0, 100)", self.confidence_level),
            ));
        }
        Ok(())
    }

    /// Trim proportion per tail
    pub fn trim_fraction(&self) -> f64 {
        self.trim_percent / 100.0
    }
}

/// One examine request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamineRequest {
    pub variable: Variable,
    pub data: Vec<CellValue>,
    /// Case number of each raw case; defaults to the 1-based position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_numbers: Option<Vec<u64>>,
    #[serde(default, deserialize_with = "deserialize_weights", skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub options: ExamineOptions,
}

impl ExamineRequest {
    pub fn new(variable: Variable, data: Vec<CellValue>) -> Self {
        Self {
            variable,
            data,
            case_numbers: None,
            weights: None,
            options: ExamineOptions::default(),
        }
    }

    pub fn with_case_numbers(mut self, case_numbers: Vec<u64>) -> Self {
        self.case_numbers = Some(case_numbers);
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_options(mut self, options: ExamineOptions) -> Self {
        self.options = options;
        self
    }

    /// Case number of the raw case at `position`
    pub fn case_number(&self, position: usize) -> u64 {
        self.case_numbers
            .as_ref()
            .and_then(|c| c.get(position).copied())
            .unwrap_or(position as u64 + 1)
    }

    pub fn check_shape(&self) -> Result<()> {
        match &self.case_numbers {
            Some(c) => check_len(self.data.len(), c.len(), "case numbers"),
            None => Ok(()),
        }
    }
}
