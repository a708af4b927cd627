//! Frequency tables and weighted percentiles
//!
//! This crate provides the frequency procedure of the tabstat engine:
//! - Distinct-value grouping with reproducible category orders
//! - Five SPSS percentile definitions on the weighted empirical distribution
//! - Frequency and `Statistics` tables in the uniform result bundle
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Calculator, CellValue, ScalarPrimitives, Variable};
//! use tabstat_frequency::{FrequencyCalculator, FrequencyRequest};
//!
//! let data = ["A", "B", "A", "A", "C"].iter().map(|v| CellValue::from(*v)).collect();
//! let request = FrequencyRequest::new(Variable::string("grade"), data);
//! let calculator = FrequencyCalculator::new(ScalarPrimitives::new());
//!
//! let result = calculator.analyze(&request).unwrap();
//! assert_eq!(result.rows[0].percent, 60.0);
//!
//! let bundle = calculator.compute(&request).unwrap();
//! assert!(bundle.table("grade").is_some());
//! ```

pub mod calculator;
pub mod grouping;
pub mod options;
pub mod percentile;

pub use calculator::{
    frequency_table, statistics_table, FrequencyCalculator, FrequencyResult, FrequencyRow, MissingRow, Mode,
};
pub use grouping::{distinct_sorted, group_values, sort_groups, SortOrder, ValueGroup};
pub use options::{FrequencyOptions, FrequencyRequest, FrequencyStatistic};
pub use percentile::{
    cut_points, merge_percentiles, validate_percentiles, PercentileEstimator, PercentileMethod, WeightedSample,
};
