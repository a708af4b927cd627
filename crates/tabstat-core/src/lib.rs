//! Core data model and weighted primitives for the tabstat engine
//!
//! This crate provides the pieces every procedure crate builds on:
//! - Raw cell values and category keys (`CellValue`, `ValueKey`)
//! - Variable descriptors with user-missing rules (`Variable`, `MissingSpec`)
//! - Validity filtering with case accounting (`get_valid_data`, `CaseSummary`)
//! - Weighted moments with SPSS small-sample corrections (`Moments`)
//! - The `StatPrimitives` seam injected into calculators
//! - The uniform pivot-table output (`ResultBundle`, `Table`, `Row`, `Cell`)
//!
//! # Conventions
//!
//! | Concept | Rule |
//! |---------|------|
//! | Effective N | Total weight `W = Σw` of valid cases |
//! | Unusable weight | Not finite or `≤ 0`: case dropped entirely |
//! | Not computable | `None` at the API, `null` in tables, never an error |
//! | Category order | Numbers before strings, numbers ascending |
//!
//! # Example
//!
//! ```rust
//! use tabstat_core::{get_valid_data, CellValue, ScalarPrimitives, StatPrimitives, Variable};
//!
//! let var = Variable::numeric("score");
//! let data = vec![CellValue::from(1.0), CellValue::Missing, CellValue::from(3.0)];
//! let valid = get_valid_data(&var, &data, None).unwrap();
//!
//! let p = ScalarPrimitives::new();
//! assert_eq!(p.weighted_mean(&valid.numbers(), Some(&valid.weights)), Some(2.0));
//! assert_eq!(valid.summary.system_missing, 1);
//! ```

pub mod error;
pub mod moments;
pub mod primitives;
pub mod table;
pub mod traits;
pub mod validity;
pub mod value;
pub mod variable;

pub use error::{check_len, Error, Result};
pub use moments::{se_kurtosis, se_skewness, Moments};
pub use primitives::{
    scalar_primitives, weighted_kurtosis, weighted_mean, weighted_skewness, weighted_std_dev,
    weighted_variance, ScalarPrimitives, StatPrimitives,
};
pub use table::{Cell, ResultBundle, Row, Table, CASE_PROCESSING_COLUMNS};
pub use traits::{Calculator, CalculatorKind};
pub use validity::{
    check_weights, deserialize_weights, get_listwise_data, get_valid_data, is_usable_weight,
    is_valid_number, CaseSummary, ListwiseData, ValidData,
};
pub use value::{CellValue, ValueKey};
pub use variable::{Classified, Measure, MissingRange, MissingSpec, ValueLabel, Variable, VariableType};

/// Percentage `part / whole × 100`; `None` when `whole` is zero
pub fn percent(part: f64, whole: f64) -> Option<f64> {
    (whole > 0.0).then(|| part / whole * 100.0)
}

/// Header for percentile `p`: at most four decimals, no trailing zeros
pub fn percentile_label(p: f64) -> String {
    let fixed = format!("{p:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        t => t.to_string(),
    }
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        get_valid_data, Calculator, CalculatorKind, Cell, CellValue, Error, Result, ResultBundle,
        Row, ScalarPrimitives, StatPrimitives, Table, ValueKey, Variable,
    };
}
