//! Descriptive calculator

use crate::options::{DescriptiveOptions, DescriptiveRequest, DescriptiveStatistic};
use tabstat_core::{
    get_listwise_data, get_valid_data, Calculator, CalculatorKind, CaseSummary, CellValue, Moments, Result,
    ResultBundle, Row, ScalarPrimitives, StatPrimitives, Table, Variable,
};
use tracing::{debug, instrument};

pub const TITLE: &str = "Descriptive Statistics";
pub const LISTWISE_ROW: &str = "Valid N (listwise)";

/// Moments and case counts for one variable
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveResult {
    pub summary: CaseSummary,
    /// `None` when no case is valid
    pub moments: Option<Moments>,
}

impl DescriptiveResult {
    /// Effective N
    pub fn n(&self) -> f64 {
        self.summary.valid_weight
    }

    pub fn value(&self, stat: DescriptiveStatistic) -> Option<f64> {
        stat.evaluate(self.moments.as_ref())
    }
}

/// Weighted moments in one row per variable
#[derive(Debug, Clone, Default)]
pub struct DescriptiveCalculator<P: StatPrimitives = ScalarPrimitives> {
    primitives: P,
}

impl<P: StatPrimitives> DescriptiveCalculator<P> {
    pub fn new(primitives: P) -> Self {
        Self { primitives }
    }

    /// Moments of the valid cases of one column
    pub fn describe(&self, variable: &Variable, data: &[CellValue], weights: Option<&[f64]>) -> Result<DescriptiveResult> {
        let valid = get_valid_data(variable, data, weights)?;
        let moments = if variable.is_numeric() {
            self.primitives.moments(&valid.numbers(), Some(&valid.weights))
        } else {
            None
        };
        Ok(DescriptiveResult {
            summary: valid.summary,
            moments,
        })
    }

    /// Describe several aligned columns in one table
    ///
    /// Each variable uses all of its own valid cases; a final
    /// `Valid N (listwise)` row counts the cases valid in every column.
    #[instrument(skip_all, fields(variables = columns.len()))]
    pub fn describe_many(
        &self,
        columns: &[(&Variable, &[CellValue])],
        weights: Option<&[f64]>,
        options: &DescriptiveOptions,
    ) -> Result<ResultBundle> {
        options.validate()?;
        let stats = options.columns();
        let mut table = descriptive_table(&stats);
        for (variable, data) in columns {
            let result = self.describe(variable, data, weights)?;
            table.push(descriptive_row(variable, &result, &stats));
        }
        let listwise = get_listwise_data(columns, weights)?;
        table.push(Row::new([LISTWISE_ROW]).cell("N", listwise.summary.valid_weight));
        debug!(listwise = listwise.summary.valid, "descriptives complete");
        Ok(std::iter::once(table).collect())
    }
}

/// Empty descriptive table with `N` followed by the statistic columns
pub fn descriptive_table(stats: &[DescriptiveStatistic]) -> Table {
    let headers = std::iter::once("N").chain(stats.iter().map(|s| s.header()));
    Table::new(TITLE, headers)
}

/// One variable's row; uncomputable statistics are blank
pub fn descriptive_row(variable: &Variable, result: &DescriptiveResult, stats: &[DescriptiveStatistic]) -> Row {
    let mut row = Row::new([variable.display_name()]).cell("N", result.n());
    for &stat in stats {
        row.set(stat.header(), result.value(stat));
    }
    row
}

impl<P: StatPrimitives> Calculator for DescriptiveCalculator<P> {
    type Request = DescriptiveRequest;

    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Descriptive
    }

    fn variable_name(&self, request: &DescriptiveRequest) -> String {
        request.variable.name.clone()
    }

    #[instrument(skip_all, fields(variable = %request.variable.name))]
    fn compute(&self, request: &DescriptiveRequest) -> Result<ResultBundle> {
        request.options.validate()?;
        let stats = request.options.columns();
        let result = self.describe(&request.variable, &request.data, request.weights.as_deref())?;
        debug!(valid = result.summary.valid, missing = result.summary.missing(), "described");

        let mut table = descriptive_table(&stats);
        table.push(descriptive_row(&request.variable, &result, &stats));
        if result.summary.valid == 0 {
            table.footnote(format!("There are no valid cases for {}.", request.variable.display_name()));
        }
        let mut bundle = ResultBundle::new();
        bundle.push(Table::case_processing(request.variable.display_name(), &result.summary));
        bundle.push(table);
        Ok(bundle)
    }
}
