//! Crosstabs calculator

use crate::chisquare::{
    continuity_correction, fisher_exact, likelihood_ratio, linear_by_linear, pearson, symmetric_measures,
    ChiSquareTest, FisherExact, SymmetricMeasures,
};
use crate::contingency::Contingency;
use crate::options::{CellContent, CrosstabStatistic, CrosstabsRequest, ExcludeMode};
use tabstat_core::{
    get_listwise_data, percent, Calculator, CalculatorKind, CaseSummary, Result, ResultBundle, Row,
    ScalarPrimitives, StatPrimitives, Table, Variable,
};
use tracing::{debug, instrument};

pub const TOTAL: &str = "Total";
pub const NO_VALID_CASES: &str = "No valid cases.";
pub const TWO_BY_TWO_NOTE: &str = "Computed only for a 2x2 table";

pub const CHI_SQUARE_COLUMNS: [&str; 5] = [
    "Value",
    "df",
    "Asymptotic Significance (2-sided)",
    "Exact Sig. (2-sided)",
    "Exact Sig. (1-sided)",
];
pub const MEASURE_COLUMNS: [&str; 2] = ["Value", "Approximate Significance"];

/// Everything one crosstabs run computes
#[derive(Debug, Clone, PartialEq)]
pub struct CrosstabsResult {
    pub summary: CaseSummary,
    pub table: Contingency,
    pub pearson: Option<ChiSquareTest>,
    pub likelihood_ratio: Option<ChiSquareTest>,
    pub continuity_correction: Option<ChiSquareTest>,
    pub linear_by_linear: Option<ChiSquareTest>,
    pub fisher: Option<FisherExact>,
    pub measures: Option<SymmetricMeasures>,
}

/// Two-way contingency analysis
#[derive(Debug, Clone, Default)]
pub struct CrosstabsCalculator<P: StatPrimitives = ScalarPrimitives> {
    primitives: P,
}

impl<P: StatPrimitives> CrosstabsCalculator<P> {
    pub fn new(primitives: P) -> Self {
        Self { primitives }
    }

    #[instrument(skip_all, fields(table = %request.name(), cases = request.data.row.len()))]
    pub fn analyze(&self, request: &CrosstabsRequest) -> Result<CrosstabsResult> {
        request.check_shape()?;
        if request.options.exclude == ExcludeMode::Pairwise {
            debug!("pairwise exclusion on a single table drops the same cases as listwise");
        }
        let vars = &request.variable;
        let data = get_listwise_data(
            &[(&vars.row, request.data.row.as_slice()), (&vars.col, request.data.col.as_slice())],
            request.weights.as_deref(),
        )?;
        let table = Contingency::build(&data.columns[0], &data.columns[1], &data.weights);
        debug!(
            rows = table.n_rows(),
            cols = table.n_cols(),
            total = table.total,
            backend = self.primitives.backend_name(),
            "tabulated"
        );

        Ok(CrosstabsResult {
            summary: data.summary,
            pearson: pearson(&table),
            likelihood_ratio: likelihood_ratio(&table),
            continuity_correction: continuity_correction(&table),
            linear_by_linear: linear_by_linear(&table),
            fisher: fisher_exact(&table),
            measures: symmetric_measures(&table),
            table,
        })
    }
}

fn body_value(t: &Contingency, content: CellContent, i: usize, j: usize) -> Option<f64> {
    match content {
        CellContent::Count => Some(t.counts[i][j]),
        CellContent::Expected => Some(t.expected(i, j)),
        CellContent::Row => t.row_percent(i, j),
        CellContent::Column => t.col_percent(i, j),
        CellContent::Total => t.total_percent(i, j),
        CellContent::Residual => Some(t.residual(i, j)),
        CellContent::Standardized => t.standardized_residual(i, j),
        CellContent::Adjusted => t.adjusted_residual(i, j),
    }
}

/// Value of a marginal cell; `of_row` marks a row total
fn margin_value(content: CellContent, margin: f64, total: f64, of_row: bool) -> Option<f64> {
    match content {
        CellContent::Count | CellContent::Expected => Some(margin),
        CellContent::Row if of_row => percent(margin, margin),
        CellContent::Column if !of_row => percent(margin, margin),
        CellContent::Row | CellContent::Column | CellContent::Total => percent(margin, total),
        CellContent::Residual | CellContent::Standardized | CellContent::Adjusted => None,
    }
}

/// The `<row> * <col> Crosstabulation` pivot
pub fn crosstabulation_table(request: &CrosstabsRequest, result: &CrosstabsResult) -> Table {
    let (row_var, col_var) = (&request.variable.row, &request.variable.col);
    let t = &result.table;
    let col_labels: Vec<String> = t.col_keys.iter().map(|k| col_var.value_label(k)).collect();
    let title = format!("{} * {} Crosstabulation", row_var.display_name(), col_var.display_name());
    let mut table = Table::new(title, col_labels.iter().map(String::as_str).chain([TOTAL]));
    let contents = request.options.cell_contents();

    for (i, key) in t.row_keys.iter().enumerate() {
        let row_label = row_var.value_label(key);
        for &content in &contents {
            let label = content.label(row_var, col_var);
            let mut row = Row::new([row_label.as_str(), label.as_str()]);
            for (j, col_label) in col_labels.iter().enumerate() {
                row.set(col_label.as_str(), body_value(t, content, i, j));
            }
            row.set(TOTAL, margin_value(content, t.row_totals[i], t.total, true));
            table.push(row);
        }
    }
    for &content in &contents {
        let label = content.label(row_var, col_var);
        let mut row = Row::new([TOTAL, label.as_str()]);
        for (j, col_label) in col_labels.iter().enumerate() {
            row.set(col_label.as_str(), margin_value(content, t.col_totals[j], t.total, false));
        }
        row.set(TOTAL, margin_value(content, t.total, t.total, false));
        table.push(row);
    }
    if t.is_empty() {
        table.footnote(NO_VALID_CASES);
    }
    table
}

/// Why no statistics were computed, if they were not
fn untestable_note(row: &Variable, col: &Variable, t: &Contingency) -> Option<String> {
    if t.is_empty() {
        Some(NO_VALID_CASES.to_string())
    } else if t.n_rows() < 2 {
        Some(format!("No statistics are computed because {} is a constant.", row.display_name()))
    } else if t.n_cols() < 2 {
        Some(format!("No statistics are computed because {} is a constant.", col.display_name()))
    } else {
        None
    }
}

fn test_row(label: &str, test: Option<ChiSquareTest>) -> Row {
    Row::new([label])
        .cell("Value", test.map(|t| t.value))
        .cell("df", test.map(|t| t.df))
        .cell(CHI_SQUARE_COLUMNS[2], test.and_then(|t| t.significance))
}

pub fn chi_square_table(request: &CrosstabsRequest, result: &CrosstabsResult) -> Table {
    let t = &result.table;
    let vars = &request.variable;
    let mut table = Table::new("Chi-Square Tests", CHI_SQUARE_COLUMNS);
    table.push(test_row("Pearson Chi-Square", result.pearson));
    if t.is_2x2() {
        table.push(test_row("Continuity Correction", result.continuity_correction));
    }
    table.push(test_row("Likelihood Ratio", result.likelihood_ratio));
    if t.is_2x2() {
        table.push(
            Row::new(["Fisher's Exact Test"])
                .cell(CHI_SQUARE_COLUMNS[3], result.fisher.map(|f| f.two_sided))
                .cell(CHI_SQUARE_COLUMNS[4], result.fisher.map(|f| f.one_sided)),
        );
    }
    if vars.row.is_numeric() && vars.col.is_numeric() {
        table.push(test_row("Linear-by-Linear Association", result.linear_by_linear));
    }
    table.push(Row::new(["N of Valid Cases"]).cell("Value", t.total));

    match untestable_note(&vars.row, &vars.col, t) {
        Some(note) => table.footnote(note),
        None => {
            if t.is_2x2() {
                table.footnote(TWO_BY_TWO_NOTE);
            }
            let cells = t.n_rows() * t.n_cols();
            let small = t.small_expected_cells();
            table.footnote(format!(
                "{} cells ({:.1}%) have expected count less than 5. The minimum expected count is {:.2}.",
                small,
                100.0 * small as f64 / cells as f64,
                t.min_expected().unwrap_or(0.0)
            ));
        }
    }
    table
}

pub fn symmetric_measures_table(request: &CrosstabsRequest, result: &CrosstabsResult) -> Table {
    let options = &request.options;
    let m = result.measures;
    let significance = m.and_then(|m| m.significance);
    let mut table = Table::new("Symmetric Measures", MEASURE_COLUMNS);
    let measure = |label: &str, value: Option<f64>| {
        Row::new(["Nominal by Nominal", label])
            .cell("Value", value)
            .cell("Approximate Significance", significance)
    };
    if options.wants(CrosstabStatistic::Phi) {
        table.push(measure("Phi", m.map(|m| m.phi)));
        table.push(measure("Cramer's V", m.map(|m| m.cramers_v)));
    }
    if options.wants(CrosstabStatistic::ContingencyCoefficient) {
        table.push(measure("Contingency Coefficient", m.map(|m| m.contingency_coefficient)));
    }
    table.push(Row::new(["N of Valid Cases"]).cell("Value", result.table.total));
    if let Some(note) = untestable_note(&request.variable.row, &request.variable.col, &result.table) {
        table.footnote(note);
    }
    table
}

impl<P: StatPrimitives> Calculator for CrosstabsCalculator<P> {
    type Request = CrosstabsRequest;

    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Crosstabs
    }

    fn variable_name(&self, request: &CrosstabsRequest) -> String {
        request.name()
    }

    fn compute(&self, request: &CrosstabsRequest) -> Result<ResultBundle> {
        let result = self.analyze(request)?;
        let options = &request.options;
        let mut bundle = ResultBundle::new();
        bundle.push(Table::case_processing(&request.name(), &result.summary));
        bundle.push(crosstabulation_table(request, &result));
        if options.wants(CrosstabStatistic::ChiSquare) {
            bundle.push(chi_square_table(request, &result));
        }
        if options.wants(CrosstabStatistic::Phi) || options.wants(CrosstabStatistic::ContingencyCoefficient) {
            bundle.push(symmetric_measures_table(request, &result));
        }
        Ok(bundle)
    }
}
