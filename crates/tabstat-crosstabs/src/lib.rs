//! Two-way crosstabulation
//!
//! Cases valid on both variables are tabulated into a weighted contingency
//! table whose categories are the distinct values of each axis in ascending
//! order. On top of the table the crate computes:
//! - Pearson, likelihood-ratio and linear-by-linear chi-square tests
//! - Yates' continuity correction and Fisher's exact test for 2x2 tables
//! - Phi, Cramer's V and the contingency coefficient
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Calculator, CellValue, ScalarPrimitives, Variable};
//! use tabstat_crosstabs::{CrosstabStatistic, CrosstabsCalculator, CrosstabsOptions, CrosstabsRequest};
//!
//! let rows = [1.0, 1.0, 2.0, 2.0].map(CellValue::Number).to_vec();
//! let cols = ["x", "y", "x", "y"].map(CellValue::from).to_vec();
//! let options = CrosstabsOptions {
//!     statistics: vec![CrosstabStatistic::ChiSquare],
//!     ..Default::default()
//! };
//! let request = CrosstabsRequest::new(Variable::numeric("r"), Variable::string("c"), rows, cols)
//!     .with_options(options);
//!
//! let bundle = CrosstabsCalculator::new(ScalarPrimitives::new()).compute(&request).unwrap();
//! let tests = bundle.table("Chi-Square Tests").unwrap();
//! assert_eq!(tests.number(&["Pearson Chi-Square"], "Value"), Some(0.0));
//! ```

pub mod calculator;
pub mod chisquare;
pub mod contingency;
pub mod options;

pub use calculator::{
    chi_square_table, crosstabulation_table, symmetric_measures_table, CrosstabsCalculator, CrosstabsResult,
    NO_VALID_CASES,
};
pub use chisquare::{
    continuity_correction, fisher_exact, likelihood_ratio, linear_by_linear, pearson, symmetric_measures,
    upper_tail, ChiSquareTest, FisherExact, SymmetricMeasures,
};
pub use contingency::Contingency;
pub use options::{
    CellContent, CrosstabData, CrosstabStatistic, CrosstabVariables, CrosstabsOptions, CrosstabsRequest, ExcludeMode,
};
