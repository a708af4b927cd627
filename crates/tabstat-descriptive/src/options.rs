//! Request and option types for the descriptive procedure

use serde::{Deserialize, Serialize};
use tabstat_core::{deserialize_weights, CellValue, Error, Moments, Result, Variable};

/// A statistic the descriptive table can report
///
/// Variants are declared in the canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DescriptiveStatistic {
    Range,
    #[serde(alias = "minimum")]
    Min,
    #[serde(alias = "maximum")]
    Max,
    Sum,
    Mean,
    SeMean,
    #[serde(alias = "stdDev", alias = "stddev")]
    Sd,
    Variance,
    Skewness,
    SeSkewness,
    Kurtosis,
    SeKurtosis,
}

impl DescriptiveStatistic {
    pub const ALL: [DescriptiveStatistic; 12] = [
        DescriptiveStatistic::Range,
        DescriptiveStatistic::Min,
        DescriptiveStatistic::Max,
        DescriptiveStatistic::Sum,
        DescriptiveStatistic::Mean,
        DescriptiveStatistic::SeMean,
        DescriptiveStatistic::Sd,
        DescriptiveStatistic::Variance,
        DescriptiveStatistic::Skewness,
        DescriptiveStatistic::SeSkewness,
        DescriptiveStatistic::Kurtosis,
        DescriptiveStatistic::SeKurtosis,
    ];

    /// Column header for this statistic
    pub fn header(&self) -> &'static str {
        match self {
            DescriptiveStatistic::Range => "Range",
            DescriptiveStatistic::Min => "Minimum",
            DescriptiveStatistic::Max => "Maximum",
            DescriptiveStatistic::Sum => "Sum",
            DescriptiveStatistic::Mean => "Mean",
            DescriptiveStatistic::SeMean => "Std. Error of Mean",
            DescriptiveStatistic::Sd => "Std. Deviation",
            DescriptiveStatistic::Variance => "Variance",
            DescriptiveStatistic::Skewness => "Skewness",
            DescriptiveStatistic::SeSkewness => "Std. Error of Skewness",
            DescriptiveStatistic::Kurtosis => "Kurtosis",
            DescriptiveStatistic::SeKurtosis => "Std. Error of Kurtosis",
        }
    }

    /// Value of this statistic; `None` when not computable
    pub fn evaluate(&self, moments: Option<&Moments>) -> Option<f64> {
        let m = moments?;
        match self {
            DescriptiveStatistic::Range => Some(m.range()),
            DescriptiveStatistic::Min => Some(m.min),
            DescriptiveStatistic::Max => Some(m.max),
            DescriptiveStatistic::Sum => Some(m.sum),
            DescriptiveStatistic::Mean => Some(m.mean),
            DescriptiveStatistic::SeMean => m.se_mean(),
            DescriptiveStatistic::Sd => m.std_dev(),
            DescriptiveStatistic::Variance => m.variance(),
            DescriptiveStatistic::Skewness => m.skewness(),
            DescriptiveStatistic::SeSkewness => m.se_skewness(),
            DescriptiveStatistic::Kurtosis => m.kurtosis(),
            DescriptiveStatistic::SeKurtosis => m.se_kurtosis(),
        }
    }
}

fn default_statistics() -> Vec<DescriptiveStatistic> {
    vec![
        DescriptiveStatistic::Mean,
        DescriptiveStatistic::Sd,
        DescriptiveStatistic::Min,
        DescriptiveStatistic::Max,
    ]
}

/// Options of one descriptive run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DescriptiveOptions {
    pub statistics: Vec<DescriptiveStatistic>,
}

impl Default for DescriptiveOptions {
    fn default() -> Self {
        Self {
            statistics: default_statistics(),
        }
    }
}

impl DescriptiveOptions {
    pub fn new(statistics: impl IntoIterator<Item = DescriptiveStatistic>) -> Self {
        Self {
            statistics: statistics.into_iter().collect(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.statistics.is_empty() {
            return Err(Error::invalid_option("statistics", "at least one statistic is required"));
        }
        Ok(())
    }

    /// Requested statistics in canonical order, without duplicates
    pub fn columns(&self) -> Vec<DescriptiveStatistic> {
        DescriptiveStatistic::ALL
            .into_iter()
            .filter(|s| self.statistics.contains(s))
            .collect()
    }
}

/// One descriptive request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveRequest {
    pub variable: Variable,
    pub data: Vec<CellValue>,
    #[serde(default, deserialize_with = "deserialize_weights", skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub options: DescriptiveOptions,
}

impl DescriptiveRequest {
    pub fn new(variable: Variable, data: Vec<CellValue>) -> Self {
        Self {
            variable,
            data,
            weights: None,
            options: DescriptiveOptions::default(),
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_options(mut self, options: DescriptiveOptions) -> Self {
        self.options = options;
        self
    }
}
