//! Request and option types for the frequency procedure

use crate::grouping::SortOrder;
use crate::percentile::{cut_points, merge_percentiles, validate_percentiles, PercentileMethod};
use serde::{Deserialize, Serialize};
use tabstat_core::{deserialize_weights, CellValue, Error, Result, Variable};

const QUARTILES: [f64; 3] = [25.0, 50.0, 75.0];

/// Statistics the `Statistics` table can report besides N
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrequencyStatistic {
    Mean,
    SeMean,
    Median,
    Mode,
    #[serde(alias = "sd")]
    StdDev,
    Variance,
    Skewness,
    Kurtosis,
    Range,
    #[serde(alias = "min")]
    Minimum,
    #[serde(alias = "max")]
    Maximum,
    Sum,
}

impl FrequencyStatistic {
    /// Every statistic, in table order
    pub const ALL: [FrequencyStatistic; 12] = [
        FrequencyStatistic::Mean,
        FrequencyStatistic::SeMean,
        FrequencyStatistic::Median,
        FrequencyStatistic::Mode,
        FrequencyStatistic::StdDev,
        FrequencyStatistic::Variance,
        FrequencyStatistic::Skewness,
        FrequencyStatistic::Kurtosis,
        FrequencyStatistic::Range,
        FrequencyStatistic::Minimum,
        FrequencyStatistic::Maximum,
        FrequencyStatistic::Sum,
    ];
}

/// Options of one frequency run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrequencyOptions {
    /// Category order; defaults by level of measurement
    pub sort_order: Option<SortOrder>,
    /// Requested percentiles in `[0, 100]`
    pub percentiles: Vec<f64>,
    pub quartiles: bool,
    /// Number of equal groups to cut the sample into
    pub cut_points: Option<usize>,
    pub percentile_method: PercentileMethod,
    pub statistics: Vec<FrequencyStatistic>,
    pub display_frequency_table: bool,
}

impl Default for FrequencyOptions {
    fn default() -> Self {
        Self {
            sort_order: None,
            percentiles: Vec::new(),
            quartiles: false,
            cut_points: None,
            percentile_method: PercentileMethod::default(),
            statistics: Vec::new(),
            display_frequency_table: true,
        }
    }
}

impl FrequencyOptions {
    pub fn validate(&self) -> Result<()> {
        validate_percentiles(&self.percentiles)?;
        if let Some(k) = self.cut_points {
            if !(2..=100).contains(&k) {
                return Err(Error::invalid_option("cutPoints", format!("{k} groups, must be in [2, 100]")));
            }
        }
        Ok(())
    }

    /// All percentiles to report: requested, quartiles, cut points
    pub fn requested_percentiles(&self) -> Vec<f64> {
        let quartiles: &[f64] = if self.quartiles { &QUARTILES } else { &[] };
        let cuts = self.cut_points.map(cut_points).unwrap_or_default();
        merge_percentiles(&[self.percentiles.as_slice(), quartiles, cuts.as_slice()])
    }

    /// Requested statistics, de-duplicated in table order
    pub fn statistics_in_order(&self) -> Vec<FrequencyStatistic> {
        FrequencyStatistic::ALL
            .into_iter()
            .filter(|s| self.statistics.contains(s))
            .collect()
    }
}

/// One frequency request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyRequest {
    pub variable: Variable,
    pub data: Vec<CellValue>,
    #[serde(default, deserialize_with = "deserialize_weights", skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub options: FrequencyOptions,
}

impl FrequencyRequest {
    pub fn new(variable: Variable, data: Vec<CellValue>) -> Self {
        Self {
            variable,
            data,
            weights: None,
            options: FrequencyOptions::default(),
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_options(mut self, options: FrequencyOptions) -> Self {
        self.options = options;
        self
    }
}
