//! Frequency calculator

use crate::grouping::{distinct_sorted, group_values, sort_groups, SortOrder, ValueGroup};
use crate::options::{FrequencyRequest, FrequencyStatistic};
use crate::percentile::{PercentileEstimator, WeightedSample};
use tabstat_core::{
    get_valid_data, percent, percentile_label, Calculator, CalculatorKind, CaseSummary, Cell, Moments, Result,
    ResultBundle, Row, ScalarPrimitives, StatPrimitives, Table, ValueKey, Variable,
};
use tracing::{debug, instrument};

pub const FREQUENCY_COLUMNS: [&str; 4] = ["Frequency", "Percent", "Valid Percent", "Cumulative Percent"];
pub const MULTIPLE_MODES_NOTE: &str = "Multiple modes exist. The smallest value is shown";

/// One category of the frequency table
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRow {
    pub value: ValueKey,
    /// Value label, or the value itself
    pub label: String,
    pub count: usize,
    pub weighted_count: f64,
    pub percent: f64,
    pub valid_percent: f64,
    pub cumulative_percent: f64,
}

/// One missing category; `value` is `None` for system-missing
#[derive(Debug, Clone, PartialEq)]
pub struct MissingRow {
    pub value: Option<ValueKey>,
    pub label: String,
    pub count: usize,
    pub weighted_count: f64,
    pub percent: f64,
}

/// Most frequent value
#[derive(Debug, Clone, PartialEq)]
pub struct Mode {
    pub value: ValueKey,
    pub weighted_count: f64,
    /// Several values share the highest count; `value` is the smallest
    pub multiple: bool,
}

/// Everything one frequency run computes, before projection into tables
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResult {
    pub rows: Vec<FrequencyRow>,
    pub missing_rows: Vec<MissingRow>,
    pub summary: CaseSummary,
    /// `(p, value)` for every requested percentile, ascending in `p`
    pub percentiles: Vec<(f64, Option<f64>)>,
    pub median: Option<f64>,
    pub mode: Option<Mode>,
    /// Moments of the valid values; `None` for string variables
    pub moments: Option<Moments>,
}

impl FrequencyResult {
    /// Valid percents sum to 100 whenever any case is valid
    pub fn valid_percent_total(&self) -> f64 {
        self.rows.iter().map(|r| r.valid_percent).sum()
    }
}

/// Frequency tables with percentiles and summary statistics
#[derive(Debug, Clone, Default)]
pub struct FrequencyCalculator<P: StatPrimitives = ScalarPrimitives> {
    primitives: P,
}

impl<P: StatPrimitives> FrequencyCalculator<P> {
    pub fn new(primitives: P) -> Self {
        Self { primitives }
    }

    pub fn primitives(&self) -> &P {
        &self.primitives
    }

    /// Compute frequencies, percentiles and statistics for one variable
    #[instrument(skip_all, fields(variable = %request.variable.name, cases = request.data.len()))]
    pub fn analyze(&self, request: &FrequencyRequest) -> Result<FrequencyResult> {
        let options = &request.options;
        options.validate()?;
        let variable = &request.variable;
        let valid = get_valid_data(variable, &request.data, request.weights.as_deref())?;
        let summary = valid.summary;
        let total_weight = summary.total_weight();
        let valid_weight = summary.valid_weight;

        let mut groups = group_values(&valid.keys, &valid.weights);
        let mode = find_mode(&groups);
        let order = options.sort_order.unwrap_or_else(|| SortOrder::default_for(variable.measure));
        sort_groups(&mut groups, order);

        let mut cumulative = 0.0;
        let rows: Vec<FrequencyRow> = groups
            .into_iter()
            .map(|g| {
                let valid_percent = percent(g.weighted_count, valid_weight).unwrap_or(0.0);
                cumulative += valid_percent;
                FrequencyRow {
                    label: variable.value_label(&g.key),
                    count: g.count,
                    weighted_count: g.weighted_count,
                    percent: percent(g.weighted_count, total_weight).unwrap_or(0.0),
                    valid_percent,
                    cumulative_percent: cumulative,
                    value: g.key,
                }
            })
            .collect();

        let missing_keys: Vec<ValueKey> = valid.user_missing.iter().map(|(k, _)| k.clone()).collect();
        let missing_weights: Vec<f64> = valid.user_missing.iter().map(|(_, w)| *w).collect();
        let mut missing_rows: Vec<MissingRow> = distinct_sorted(&missing_keys, &missing_weights)
            .into_iter()
            .map(|g| MissingRow {
                label: variable.value_label(&g.key),
                count: g.count,
                weighted_count: g.weighted_count,
                percent: percent(g.weighted_count, total_weight).unwrap_or(0.0),
                value: Some(g.key),
            })
            .collect();
        if summary.system_missing > 0 {
            missing_rows.push(MissingRow {
                value: None,
                label: "System".to_string(),
                count: summary.system_missing,
                weighted_count: summary.system_missing_weight,
                percent: percent(summary.system_missing_weight, total_weight).unwrap_or(0.0),
            });
        }

        let (moments, median, percentiles) = if variable.is_numeric() {
            let numbers = valid.numbers();
            let sample = WeightedSample::new(&numbers, Some(&valid.weights));
            let method = options.percentile_method;
            let percentiles = options
                .requested_percentiles()
                .into_iter()
                .map(|p| (p, method.percentile_sorted(&sample, p)))
                .collect();
            (
                self.primitives.moments(&numbers, Some(&valid.weights)),
                method.percentile_sorted(&sample, 50.0),
                percentiles,
            )
        } else {
            let percentiles = options.requested_percentiles().into_iter().map(|p| (p, None)).collect();
            (None, None, percentiles)
        };

        debug!(
            categories = rows.len(),
            missing_categories = missing_rows.len(),
            backend = self.primitives.backend_name(),
            "frequency analysis complete"
        );

        Ok(FrequencyResult {
            rows,
            missing_rows,
            summary,
            percentiles,
            median,
            mode,
            moments,
        })
    }
}

/// Highest weighted count; ties go to the smallest value
fn find_mode(groups: &[ValueGroup]) -> Option<Mode> {
    let best = groups.iter().max_by(|a, b| {
        a.weighted_count
            .total_cmp(&b.weighted_count)
            .then_with(|| b.key.cmp(&a.key))
    })?;
    let tolerance = 1e-9 * best.weighted_count.abs().max(1.0);
    let ties = groups
        .iter()
        .filter(|g| (g.weighted_count - best.weighted_count).abs() <= tolerance)
        .count();
    Some(Mode {
        value: best.key.clone(),
        weighted_count: best.weighted_count,
        multiple: ties > 1,
    })
}

/// The frequency table, titled by the variable
pub fn frequency_table(variable: &Variable, result: &FrequencyResult) -> Table {
    let mut table = Table::new(variable.display_name(), FREQUENCY_COLUMNS);
    let summary = &result.summary;
    if summary.valid == 0 {
        table.footnote(format!("There are no valid cases for {}.", variable.display_name()));
        return table;
    }
    let total_weight = summary.total_weight();

    for row in &result.rows {
        table.push(
            Row::new(["Valid", row.label.as_str()])
                .cell("Frequency", row.weighted_count)
                .cell("Percent", row.percent)
                .cell("Valid Percent", row.valid_percent)
                .cell("Cumulative Percent", row.cumulative_percent),
        );
    }
    table.push(
        Row::new(["Valid", "Total"])
            .cell("Frequency", summary.valid_weight)
            .cell("Percent", percent(summary.valid_weight, total_weight))
            .cell("Valid Percent", 100.0),
    );

    if !result.missing_rows.is_empty() {
        for row in &result.missing_rows {
            table.push(
                Row::new(["Missing", row.label.as_str()])
                    .cell("Frequency", row.weighted_count)
                    .cell("Percent", row.percent),
            );
        }
        table.push(
            Row::new(["Missing", "Total"])
                .cell("Frequency", summary.missing_weight())
                .cell("Percent", percent(summary.missing_weight(), total_weight)),
        );
        table.push(
            Row::with_header(vec![Some("Total".to_string()), None])
                .cell("Frequency", total_weight)
                .cell("Percent", 100.0),
        );
    }
    table
}

fn statistic_rows(stat: FrequencyStatistic, variable: &Variable, result: &FrequencyResult) -> Vec<(&'static str, Cell)> {
    let m = result.moments.as_ref();
    match stat {
        FrequencyStatistic::Mean => vec![("Mean", Cell::opt(m.map(|m| m.mean)))],
        FrequencyStatistic::SeMean => vec![("Std. Error of Mean", Cell::opt(m.and_then(Moments::se_mean)))],
        FrequencyStatistic::Median => vec![("Median", Cell::opt(result.median))],
        FrequencyStatistic::Mode => {
            let cell = match &result.mode {
                Some(mode) => match mode.value.as_number() {
                    Some(v) if variable.is_numeric() => Cell::number(v),
                    _ => Cell::text(mode.value.to_string()),
                },
                None => Cell::Empty,
            };
            vec![("Mode", cell)]
        }
        FrequencyStatistic::StdDev => vec![("Std. Deviation", Cell::opt(m.and_then(Moments::std_dev)))],
        FrequencyStatistic::Variance => vec![("Variance", Cell::opt(m.and_then(Moments::variance)))],
        FrequencyStatistic::Skewness => vec![
            ("Skewness", Cell::opt(m.and_then(Moments::skewness))),
            ("Std. Error of Skewness", Cell::opt(m.and_then(Moments::se_skewness))),
        ],
        FrequencyStatistic::Kurtosis => vec![
            ("Kurtosis", Cell::opt(m.and_then(Moments::kurtosis))),
            ("Std. Error of Kurtosis", Cell::opt(m.and_then(Moments::se_kurtosis))),
        ],
        FrequencyStatistic::Range => vec![("Range", Cell::opt(m.map(Moments::range)))],
        FrequencyStatistic::Minimum => vec![("Minimum", Cell::opt(m.map(|m| m.min)))],
        FrequencyStatistic::Maximum => vec![("Maximum", Cell::opt(m.map(|m| m.max)))],
        FrequencyStatistic::Sum => vec![("Sum", Cell::opt(m.map(|m| m.sum)))],
    }
}

/// The `Statistics` table: N, requested statistics and percentiles
pub fn statistics_table(variable: &Variable, stats: &[FrequencyStatistic], result: &FrequencyResult) -> Table {
    let column = variable.name.as_str();
    let mut table = Table::new("Statistics", [column]);
    table.push(Row::new(["N", "Valid"]).cell(column, result.summary.valid_weight));
    table.push(Row::new(["N", "Missing"]).cell(column, result.summary.missing_weight()));

    for &stat in stats {
        for (label, cell) in statistic_rows(stat, variable, result) {
            table.push(Row::new([label]).cell(column, cell));
        }
        if stat == FrequencyStatistic::Mode && result.mode.as_ref().is_some_and(|m| m.multiple) {
            table.footnote(MULTIPLE_MODES_NOTE);
        }
    }
    for (p, value) in &result.percentiles {
        let label = percentile_label(*p);
        table.push(Row::new(["Percentiles", label.as_str()]).cell(column, Cell::opt(*value)));
    }
    table
}

impl<P: StatPrimitives> Calculator for FrequencyCalculator<P> {
    type Request = FrequencyRequest;

    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Frequency
    }

    fn variable_name(&self, request: &FrequencyRequest) -> String {
        request.variable.name.clone()
    }

    fn compute(&self, request: &FrequencyRequest) -> Result<ResultBundle> {
        let result = self.analyze(request)?;
        let mut bundle = ResultBundle::new();
        if request.options.display_frequency_table {
            bundle.push(frequency_table(&request.variable, &result));
        }
        bundle.push(statistics_table(
            &request.variable,
            &request.options.statistics_in_order(),
            &result,
        ));
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FrequencyOptions;
    use approx::assert_relative_eq;
    use tabstat_core::{CellValue, MissingSpec};

    fn calculator() -> FrequencyCalculator {
        FrequencyCalculator::new(ScalarPrimitives::new())
    }

    fn text_column(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    #[test]
    fn test_nominal_first_seen_percentages() {
        let request = FrequencyRequest::new(Variable::string("grade"), text_column(&["A", "B", "A", "A", "C"]));
        let result = calculator().analyze(&request).unwrap();

        let labels: Vec<&str> = result.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        let percents: Vec<f64> = result.rows.iter().map(|r| r.percent).collect();
        assert_eq!(percents, vec![60.0, 20.0, 20.0]);
        assert_relative_eq!(result.rows[2].cumulative_percent, 100.0, epsilon = 1e-9);
        assert_eq!(result.summary.valid, 5);
        assert!(result.moments.is_none());
        assert_eq!(result.mode.as_ref().unwrap().value, ValueKey::text("A"));
    }

    #[test]
    fn test_missing_rows_and_percent_bases() {
        let variable = Variable::numeric("q1").with_missing(MissingSpec::discrete([CellValue::Number(9.0)]));
        let data = vec![
            CellValue::from(1.0),
            CellValue::from(2.0),
            CellValue::from(2.0),
            CellValue::from(9.0),
            CellValue::Missing,
        ];
        let result = calculator().analyze(&FrequencyRequest::new(variable.clone(), data)).unwrap();

        assert_relative_eq!(result.rows[1].percent, 40.0);
        assert_relative_eq!(result.rows[1].valid_percent, 100.0 * 2.0 / 3.0, epsilon = 1e-12);
        assert_eq!(result.missing_rows.len(), 2);
        assert_eq!(result.missing_rows[0].value, Some(ValueKey::number(9.0)));
        assert_eq!(result.missing_rows[1].label, "System");
        assert_relative_eq!(result.missing_rows[1].percent, 20.0);

        let table = frequency_table(&variable, &result);
        assert_eq!(table.number(&["Missing", "Total"], "Frequency"), Some(2.0));
        assert_eq!(table.number(&["Valid", "Total"], "Valid Percent"), Some(100.0));
        let total = table.rows.last().unwrap();
        assert_eq!(total.row_header, vec![Some("Total".to_string()), None]);
        assert_eq!(total.number("Frequency"), Some(5.0));
    }

    #[test]
    fn test_all_missing() {
        let data = vec![CellValue::Missing; 3];
        let request = FrequencyRequest::new(Variable::numeric("x"), data);
        let result = calculator().analyze(&request).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.summary.valid, 0);
        assert_eq!(result.summary.missing(), 3);
        assert_eq!(result.summary.total(), 3);

        let bundle = calculator().compute(&request).unwrap();
        let table = bundle.table("x").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.footnotes.len(), 1);
        let stats = bundle.table("Statistics").unwrap();
        assert_eq!(stats.number(&["N", "Missing"], "x"), Some(3.0));
    }

    #[test]
    fn test_weighted_counts() {
        let data = vec![CellValue::from(1.0), CellValue::from(2.0), CellValue::from(1.0)];
        let request = FrequencyRequest::new(Variable::numeric("x"), data).with_weights(vec![2.0, 1.0, 1.0]);
        let result = calculator().analyze(&request).unwrap();
        assert_eq!(result.rows[0].count, 2);
        assert_eq!(result.rows[0].weighted_count, 3.0);
        assert_relative_eq!(result.rows[0].percent, 75.0);
        assert_relative_eq!(result.valid_percent_total(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_statistics_table() {
        let data: Vec<CellValue> = [1.0, 2.0, 2.0, 3.0, 3.0, 4.0].iter().map(|&v| CellValue::from(v)).collect();
        let options = FrequencyOptions {
            statistics: FrequencyStatistic::ALL.to_vec(),
            quartiles: true,
            ..Default::default()
        };
        let request = FrequencyRequest::new(Variable::numeric("x"), data).with_options(options);
        let bundle = calculator().compute(&request).unwrap();
        let stats = bundle.table("Statistics").unwrap();

        assert_eq!(stats.number(&["N", "Valid"], "x"), Some(6.0));
        assert_relative_eq!(stats.number(&["Mean"], "x").unwrap(), 2.5);
        assert_eq!(stats.number(&["Mode"], "x"), Some(2.0));
        assert_eq!(stats.footnotes, vec![MULTIPLE_MODES_NOTE.to_string()]);
        assert_relative_eq!(stats.number(&["Median"], "x").unwrap(), 2.5);
        assert_eq!(stats.number(&["Range"], "x"), Some(3.0));
        assert_eq!(stats.number(&["Sum"], "x"), Some(15.0));
        assert!(stats.row(&["Std. Error of Kurtosis"]).is_some());
        // (W+1)p = 1.75 → 1 + 0.75·(2 − 1)
        assert_relative_eq!(stats.number(&["Percentiles", "25"], "x").unwrap(), 1.75);
        assert_relative_eq!(stats.number(&["Percentiles", "75"], "x").unwrap(), 3.25);
    }

    #[test]
    fn test_cut_point_labels_are_rounded() {
        let data: Vec<CellValue> = [1.0, 2.0, 3.0, 4.0, 5.0].iter().map(|&v| CellValue::from(v)).collect();
        let options = FrequencyOptions {
            cut_points: Some(3),
            ..Default::default()
        };
        let request = FrequencyRequest::new(Variable::numeric("x"), data).with_options(options);
        let bundle = calculator().compute(&request).unwrap();
        let stats = bundle.table("Statistics").unwrap();
        let labels: Vec<&str> = stats
            .rows
            .iter()
            .filter(|r| r.row_header[0].as_deref() == Some("Percentiles"))
            .filter_map(|r| r.row_header[1].as_deref())
            .collect();
        assert_eq!(labels, vec!["33.3333", "66.6667"]);
        // (W+1)p = 2 → the second value
        assert_relative_eq!(stats.number(&["Percentiles", "33.3333"], "x").unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_string_statistics_blank() {
        let options = FrequencyOptions {
            statistics: vec![FrequencyStatistic::Mean, FrequencyStatistic::Mode],
            percentiles: vec![50.0],
            ..Default::default()
        };
        let request = FrequencyRequest::new(Variable::string("s"), text_column(&["b", "a", "b"])).with_options(options);
        let bundle = calculator().compute(&request).unwrap();
        let stats = bundle.table("Statistics").unwrap();
        assert_eq!(stats.row(&["Mean"]).unwrap().get("s"), Some(&Cell::Empty));
        assert_eq!(stats.row(&["Mode"]).unwrap().get("s"), Some(&Cell::text("b")));
        assert_eq!(stats.row(&["Percentiles", "50"]).unwrap().get("s"), Some(&Cell::Empty));
    }

    #[test]
    fn test_value_labels_in_headers() {
        let variable = Variable::numeric("sex")
            .with_measure(tabstat_core::Measure::Nominal)
            .with_value_label(1.0, "Male")
            .with_value_label(2.0, "Female");
        let data = vec![CellValue::from(2.0), CellValue::from(1.0)];
        let result = calculator().analyze(&FrequencyRequest::new(variable.clone(), data)).unwrap();
        let table = frequency_table(&variable, &result);
        assert_eq!(table.number(&["Valid", "Female"], "Frequency"), Some(1.0));
        assert_eq!(table.rows[0].row_header[1].as_deref(), Some("Female"));
    }

    #[test]
    fn test_hide_frequency_table() {
        let options = FrequencyOptions {
            display_frequency_table: false,
            ..Default::default()
        };
        let request = FrequencyRequest::new(Variable::numeric("x"), vec![CellValue::from(1.0)]).with_options(options);
        let bundle = calculator().compute(&request).unwrap();
        assert_eq!(bundle.len(), 1);
        assert!(bundle.table("Statistics").is_some());
    }

    #[test]
    fn test_shape_error() {
        let request = FrequencyRequest::new(Variable::numeric("x"), vec![CellValue::from(1.0)]).with_weights(vec![]);
        assert!(calculator().analyze(&request).is_err());
    }
}
