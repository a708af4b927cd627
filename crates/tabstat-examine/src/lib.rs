//! Exploratory statistics for one numeric variable
//!
//! The examine procedure extends the descriptive moments with robust
//! location estimates and a look at the tails:
//! - Student-t confidence interval for the mean
//! - Trimmed mean over the central share of the case weight
//! - Huber, Tukey biweight, Hampel and Andrews M-estimators
//! - Weighted-average percentiles next to Tukey's hinges
//! - Extreme values and boxplot outliers keyed by case number
//!
//! Every table is emitted even for tiny samples; statistics that need more
//! cases are blank.
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{Calculator, CellValue, ScalarPrimitives, Variable};
//! use tabstat_examine::{ExamineCalculator, ExamineRequest};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0, 40.0].iter().map(|&v| CellValue::Number(v)).collect();
//! let request = ExamineRequest::new(Variable::numeric("score"), data);
//! let bundle = ExamineCalculator::new(ScalarPrimitives::new()).compute(&request).unwrap();
//!
//! let outliers = bundle.table("Outliers").unwrap();
//! assert_eq!(outliers.number(&["score", "1"], "Case Number"), Some(6.0));
//! ```

pub mod calculator;
pub mod extremes;
pub mod mestimators;
pub mod options;
pub mod robust;

pub use calculator::{
    case_processing_table, descriptives_table, extreme_values_table, m_estimators_table, mean_confidence_interval,
    method_label, outliers_table, percentiles_table, ExamineCalculator, ExamineResult, MEstimate,
};
pub use extremes::{extreme_values, find_outliers, CaseValue, Extremes, Fences, Outlier, OutlierKind};
pub use mestimators::{
    m_estimate, standard_estimators, AndrewsWave, Hampel, Huber, PsiFunction, RobustStart, TukeyBiweight,
};
pub use options::{ExamineOptions, ExamineRequest, OutlierMethod, DEFAULT_PERCENTILES};
pub use robust::{trimmed_mean, Hinges};
