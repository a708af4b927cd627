//! Request and option types for two-way crosstabulation

use serde::{Deserialize, Serialize};
use tabstat_core::{check_len, deserialize_weights, CellValue, Result, Variable};

/// Missing-value policy across the two variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcludeMode {
    #[default]
    Listwise,
    /// Identical to listwise for a single two-way table
    Pairwise,
}

/// Optional statistics tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CrosstabStatistic {
    /// Chi-Square Tests table
    #[serde(rename = "chisq", alias = "chiSquare")]
    ChiSquare,
    /// Phi and Cramer's V
    #[serde(rename = "phi", alias = "cramersV")]
    Phi,
    #[serde(rename = "cc", alias = "contingencyCoefficient")]
    ContingencyCoefficient,
}

/// What each cell of the crosstabulation shows, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellContent {
    Count,
    Expected,
    Row,
    Column,
    Total,
    Residual,
    #[serde(alias = "sresid")]
    Standardized,
    #[serde(alias = "asresid")]
    Adjusted,
}

impl CellContent {
    /// Row label of this content; percentages name the variable they are within
    pub fn label(&self, row: &Variable, col: &Variable) -> String {
        match self {
            CellContent::Count => "Count".to_string(),
            CellContent::Expected => "Expected Count".to_string(),
            CellContent::Row => format!("% within {}", row.display_name()),
            CellContent::Column => format!("% within {}", col.display_name()),
            CellContent::Total => "% of Total".to_string(),
            CellContent::Residual => "Residual".to_string(),
            CellContent::Standardized => "Standardized Residual".to_string(),
            CellContent::Adjusted => "Adjusted Residual".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrosstabsOptions {
    pub exclude: ExcludeMode,
    /// Pearson chi-square when absent; an explicit empty list turns it off
    pub statistics: Vec<CrosstabStatistic>,
    pub cells: Vec<CellContent>,
}

impl Default for CrosstabsOptions {
    fn default() -> Self {
        Self {
            exclude: ExcludeMode::Listwise,
            statistics: vec![CrosstabStatistic::ChiSquare],
            cells: vec![CellContent::Count],
        }
    }
}

impl CrosstabsOptions {
    pub fn wants(&self, statistic: CrosstabStatistic) -> bool {
        self.statistics.contains(&statistic)
    }

    /// Requested cell contents, deduplicated in display order; count when none
    pub fn cell_contents(&self) -> Vec<CellContent> {
        let mut cells = self.cells.clone();
        cells.sort();
        cells.dedup();
        if cells.is_empty() {
            cells.push(CellContent::Count);
        }
        cells
    }
}

/// The row and column variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosstabVariables {
    pub row: Variable,
    pub col: Variable,
}

/// Raw row and column data, aligned by case
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrosstabData {
    pub row: Vec<CellValue>,
    pub col: Vec<CellValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosstabsRequest {
    pub variable: CrosstabVariables,
    pub data: CrosstabData,
    #[serde(default, deserialize_with = "deserialize_weights", skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub options: CrosstabsOptions,
}

impl CrosstabsRequest {
    pub fn new(row: Variable, col: Variable, row_data: Vec<CellValue>, col_data: Vec<CellValue>) -> Self {
        Self {
            variable: CrosstabVariables { row, col },
            data: CrosstabData {
                row: row_data,
                col: col_data,
            },
            weights: None,
            options: CrosstabsOptions::default(),
        }
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_options(mut self, options: CrosstabsOptions) -> Self {
        self.options = options;
        self
    }

    /// `"<row> * <col>"`
    pub fn name(&self) -> String {
        format!("{} * {}", self.variable.row.name, self.variable.col.name)
    }

    pub fn check_shape(&self) -> Result<()> {
        check_len(self.data.row.len(), self.data.col.len(), "column data")
    }
}
