//! Weighted descriptive statistics
//!
//! One row per variable with `N` first and the requested statistics in the
//! canonical order `Range, Minimum, Maximum, Sum, Mean, SE Mean, SD,
//! Variance, Skewness, SE Skewness, Kurtosis, SE Kurtosis`. Statistics that
//! need more cases than are valid (variance `W > 1`, skewness `W > 2`,
//! kurtosis `W > 3`) are blank. A case processing summary with the
//! valid and missing counts comes first in the bundle.
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Calculator, CellValue, ScalarPrimitives, Variable};
//! use tabstat_descriptive::{DescriptiveCalculator, DescriptiveRequest};
//!
//! let data = (1..=5).map(|v| CellValue::Number(v as f64)).collect();
//! let request = DescriptiveRequest::new(Variable::numeric("x"), data);
//! let bundle = DescriptiveCalculator::new(ScalarPrimitives::new()).compute(&request).unwrap();
//!
//! let table = bundle.table("Descriptive Statistics").unwrap();
//! assert_eq!(table.number(&["x"], "Mean"), Some(3.0));
//! ```

pub mod calculator;
pub mod options;

pub use calculator::{descriptive_row, descriptive_table, DescriptiveCalculator, DescriptiveResult, LISTWISE_ROW, TITLE};
pub use options::{DescriptiveOptions, DescriptiveRequest, DescriptiveStatistic};
