//! # tabstat
//!
//! Statistical computation engine for tabular datasets. Calculators take raw
//! column data plus variable metadata (type, measure, missing values,
//! weights) and return their results as uniform pivot tables.
//!
//! ## Crates
//!
//! - [`tabstat_core`]: cell values, variables, validity filtering, weighted moments
//!   and the result-table model
//! - [`frequency`]: frequency tables and SPSS percentile definitions
//! - [`descriptive`]: summary moments
//! - [`examine`]: robust location, confidence interval, extremes and outliers
//! - [`crosstabs`]: two-way tables with chi-square tests and association
//! - [`worker`]: JSON dispatch, isolated workers and batch execution
//!
//! ## Example
//!
//! ```rust
//! use tabstat::prelude::*;
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0].map(CellValue::Number).to_vec();
//! let request = DescriptiveRequest::new(Variable::numeric("x"), data);
//! let bundle = DescriptiveCalculator::new(ScalarPrimitives::new()).compute(&request).unwrap();
//! let table = bundle.table("Descriptive Statistics").unwrap();
//! assert_eq!(table.number(&["x"], "Mean"), Some(3.0));
//!
//! let response = tabstat::worker::handle_message(r#"{"kind": "frequency", "variable": {"name": "g"}, "data": [1, 1, 2]}"#);
//! assert!(response.is_success());
//! ```

pub use tabstat_core;
pub use tabstat_crosstabs as crosstabs;
pub use tabstat_descriptive as descriptive;
pub use tabstat_examine as examine;
pub use tabstat_frequency as frequency;
pub use tabstat_worker as worker;

pub use tabstat_core::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use tabstat_core::prelude::*;
    pub use tabstat_crosstabs::{CrosstabStatistic, CrosstabsCalculator, CrosstabsOptions, CrosstabsRequest};
    pub use tabstat_descriptive::{DescriptiveCalculator, DescriptiveOptions, DescriptiveRequest, DescriptiveStatistic};
    pub use tabstat_examine::{ExamineCalculator, ExamineOptions, ExamineRequest};
    pub use tabstat_frequency::{FrequencyCalculator, FrequencyOptions, FrequencyRequest, PercentileMethod};
    pub use tabstat_worker::{Dispatcher, Request, Response, WorkerConfig, WorkerPool};
}
