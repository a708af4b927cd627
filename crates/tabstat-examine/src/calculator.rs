//! Examine calculator

use crate::extremes::{extreme_values, find_outliers, CaseValue, Extremes, Fences, Outlier};
use crate::mestimators::{m_estimate, standard_estimators, RobustStart};
use crate::options::{ExamineOptions, ExamineRequest, OutlierMethod};
use crate::robust::{trimmed_mean, Hinges};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tabstat_core::{
    get_valid_data, percentile_label, Calculator, CalculatorKind, CaseSummary, Cell, Moments, Result, ResultBundle,
    Row, ScalarPrimitives, StatPrimitives, Table, Variable,
};
use tabstat_frequency::percentile::FUZZ;
use tabstat_frequency::{merge_percentiles, PercentileEstimator, PercentileMethod, WeightedSample};
use tracing::{debug, instrument};

/// Percentiles at which Tukey's hinges are reported; always tabulated
pub const HINGE_PERCENTILES: [f64; 3] = [25.0, 50.0, 75.0];

/// One M-estimator column
#[derive(Debug, Clone, PartialEq)]
pub struct MEstimate {
    pub name: &'static str,
    pub description: String,
    pub value: Option<f64>,
}

/// Everything one examine run computes
#[derive(Debug, Clone, PartialEq)]
pub struct ExamineResult {
    pub summary: CaseSummary,
    pub moments: Option<Moments>,
    /// `(lower, upper)` bounds of the interval for the mean
    pub confidence_interval: Option<(f64, f64)>,
    pub trimmed_mean: Option<f64>,
    pub median: Option<f64>,
    pub interquartile_range: Option<f64>,
    /// Empty when M-estimators were not requested
    pub m_estimates: Vec<MEstimate>,
    /// Requested percentiles merged with the hinge points, ascending
    pub percentiles: Vec<(f64, Option<f64>)>,
    pub hinges: Option<Hinges>,
    pub extremes: Extremes,
    pub outliers: Vec<Outlier>,
}

/// Student-t interval for the mean with `df = W − 1`
pub fn mean_confidence_interval(moments: &Moments, level: f64) -> Option<(f64, f64)> {
    let se = moments.se_mean()?;
    let df = moments.total_weight - 1.0;
    let t = StudentsT::new(0.0, 1.0, df).ok()?;
    let critical = t.inverse_cdf(1.0 - (1.0 - level / 100.0) / 2.0);
    let half_width = critical * se;
    half_width
        .is_finite()
        .then(|| (moments.mean - half_width, moments.mean + half_width))
}

/// Row label of a percentile definition
pub fn method_label(method: PercentileMethod) -> &'static str {
    match method {
        PercentileMethod::Haverage => "Weighted Average(Definition 1)",
        PercentileMethod::Waverage => "Weighted Average(Definition 2)",
        PercentileMethod::Round => "Observation Closest to Wp",
        PercentileMethod::Empirical => "Empirical Distribution Function",
        PercentileMethod::Aempirical => "Empirical Distribution Function with Averaging",
    }
}

/// Robust exploratory statistics for one variable
#[derive(Debug, Clone, Default)]
pub struct ExamineCalculator<P: StatPrimitives = ScalarPrimitives> {
    primitives: P,
}

impl<P: StatPrimitives> ExamineCalculator<P> {
    pub fn new(primitives: P) -> Self {
        Self { primitives }
    }

    #[instrument(skip_all, fields(variable = %request.variable.name, cases = request.data.len()))]
    pub fn analyze(&self, request: &ExamineRequest) -> Result<ExamineResult> {
        let options = &request.options;
        options.validate()?;
        request.check_shape()?;
        let valid = get_valid_data(&request.variable, &request.data, request.weights.as_deref())?;

        let values = if request.variable.is_numeric() { valid.numbers() } else { Vec::new() };
        let weights: &[f64] = if values.is_empty() { &[] } else { &valid.weights };
        let cases: Vec<CaseValue> = values
            .iter()
            .zip(&valid.positions)
            .map(|(&value, &pos)| CaseValue {
                case_number: request.case_number(pos),
                value,
            })
            .collect();

        let moments = self.primitives.moments(&values, Some(weights));
        let sample = WeightedSample::new(&values, Some(weights));
        let quartile = |p: f64| PercentileMethod::Haverage.percentile_sorted(&sample, p);
        let (q1, q3) = (quartile(25.0), quartile(75.0));
        let hinges = Hinges::compute(&sample);

        let m_estimates = if options.m_estimators {
            let start = RobustStart::compute(&values, weights);
            standard_estimators()
                .iter()
                .map(|psi| MEstimate {
                    name: psi.name(),
                    description: psi.description(),
                    value: start.map(|s| m_estimate(psi.as_ref(), &values, weights, s)),
                })
                .collect()
        } else {
            Vec::new()
        };

        let fences = match options.outlier_method {
            OutlierMethod::Iqr => q1.zip(q3).map(|(lo, hi)| Fences::new(lo, hi)),
            OutlierMethod::Hinges => hinges.map(|h| Fences::new(h.lower, h.upper)),
        };
        let outliers = fences.map(|f| find_outliers(&cases, f)).unwrap_or_default();

        let method = options.percentile_method;
        let percentiles = merge_percentiles(&[options.percentiles.as_slice(), HINGE_PERCENTILES.as_slice()])
            .into_iter()
            .map(|p| (p, method.percentile_sorted(&sample, p)))
            .collect();

        debug!(
            valid = valid.summary.valid,
            outliers = outliers.len(),
            backend = self.primitives.backend_name(),
            "examine complete"
        );

        Ok(ExamineResult {
            summary: valid.summary,
            confidence_interval: moments
                .as_ref()
                .and_then(|m| mean_confidence_interval(m, options.confidence_level)),
            moments,
            trimmed_mean: trimmed_mean(&sample, options.trim_fraction()),
            median: sample.median(),
            interquartile_range: q1.zip(q3).map(|(lo, hi)| hi - lo),
            m_estimates,
            percentiles,
            hinges,
            extremes: extreme_values(&cases, options.extreme_count),
            outliers,
        })
    }
}

pub fn case_processing_table(variable: &Variable, summary: &CaseSummary) -> Table {
    Table::case_processing(variable.display_name(), summary)
}

pub fn descriptives_table(variable: &Variable, options: &ExamineOptions, result: &ExamineResult) -> Table {
    let name = variable.display_name();
    let m = result.moments.as_ref();
    let mut table = Table::new("Descriptives", ["Statistic", "Std. Error"]);
    let stat = |label: &str, value: Option<f64>| Row::new([name, label]).cell("Statistic", value);

    table.push(stat("Mean", m.map(|m| m.mean)).cell("Std. Error", m.and_then(Moments::se_mean)));
    let ci_label = format!("{}% Confidence Interval for Mean", options.confidence_level);
    let (lower, upper) = match result.confidence_interval {
        Some((lo, hi)) => (Some(lo), Some(hi)),
        None => (None, None),
    };
    table.push(Row::new([name, ci_label.as_str(), "Lower Bound"]).cell("Statistic", lower));
    table.push(Row::new([name, ci_label.as_str(), "Upper Bound"]).cell("Statistic", upper));
    table.push(stat(&format!("{}% Trimmed Mean", options.trim_percent), result.trimmed_mean));
    table.push(stat("Median", result.median));
    table.push(stat("Variance", m.and_then(Moments::variance)));
    table.push(stat("Std. Deviation", m.and_then(Moments::std_dev)));
    table.push(stat("Minimum", m.map(|m| m.min)));
    table.push(stat("Maximum", m.map(|m| m.max)));
    table.push(stat("Range", m.map(Moments::range)));
    table.push(stat("Interquartile Range", result.interquartile_range));
    table.push(stat("Skewness", m.and_then(Moments::skewness)).cell("Std. Error", m.and_then(Moments::se_skewness)));
    table.push(stat("Kurtosis", m.and_then(Moments::kurtosis)).cell("Std. Error", m.and_then(Moments::se_kurtosis)));
    table
}

pub fn m_estimators_table(variable: &Variable, result: &ExamineResult) -> Table {
    let mut table = Table::new("M-Estimators", result.m_estimates.iter().map(|e| e.name));
    let mut row = Row::new([variable.display_name()]);
    for estimate in &result.m_estimates {
        row.set(estimate.name, estimate.value);
        table.footnote(estimate.description.clone());
    }
    table.push(row);
    table
}

pub fn percentiles_table(variable: &Variable, options: &ExamineOptions, result: &ExamineResult) -> Table {
    let name = variable.display_name();
    let labels: Vec<String> = result.percentiles.iter().map(|(p, _)| percentile_label(*p)).collect();
    let mut table = Table::new("Percentiles", labels.iter().cloned());

    let mut averaged = Row::new([method_label(options.percentile_method), name]);
    for (label, (_, value)) in labels.iter().zip(&result.percentiles) {
        averaged.set(label.as_str(), *value);
    }
    table.push(averaged);

    let mut tukey = Row::new(["Tukey's Hinges", name]);
    for (label, (p, _)) in labels.iter().zip(&result.percentiles) {
        let hinge = result.hinges.and_then(|h| {
            let at = |q: f64| (p - q).abs() < FUZZ;
            if at(HINGE_PERCENTILES[0]) {
                Some(h.lower)
            } else if at(HINGE_PERCENTILES[1]) {
                Some(h.median)
            } else if at(HINGE_PERCENTILES[2]) {
                Some(h.upper)
            } else {
                None
            }
        });
        tukey.set(label.as_str(), hinge);
    }
    table.push(tukey);
    table
}

pub fn extreme_values_table(variable: &Variable, result: &ExamineResult) -> Table {
    let name = variable.display_name();
    let mut table = Table::new("Extreme Values", ["Case Number", "Value"]);
    let ends = [("Highest", &result.extremes.highest), ("Lowest", &result.extremes.lowest)];
    for (end, cases) in ends {
        for (i, case) in cases.iter().enumerate() {
            let rank = (i + 1).to_string();
            table.push(
                Row::new([name, end, rank.as_str()])
                    .cell("Case Number", case.case_number as f64)
                    .cell("Value", case.value),
            );
        }
    }
    if result.summary.valid == 0 {
        table.footnote(format!("There are no valid cases for {name}."));
    }
    table
}

pub fn outliers_table(variable: &Variable, result: &ExamineResult) -> Table {
    let name = variable.display_name();
    let mut table = Table::new("Outliers", ["Case Number", "Value", "Type"]);
    for (i, outlier) in result.outliers.iter().enumerate() {
        let rank = (i + 1).to_string();
        table.push(
            Row::new([name, rank.as_str()])
                .cell("Case Number", outlier.case_number as f64)
                .cell("Value", outlier.value)
                .cell("Type", Cell::text(outlier.kind.label())),
        );
    }
    if result.outliers.is_empty() {
        table.footnote("No outliers detected.");
    }
    table
}

impl<P: StatPrimitives> Calculator for ExamineCalculator<P> {
    type Request = ExamineRequest;

    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Examine
    }

    fn variable_name(&self, request: &ExamineRequest) -> String {
        request.variable.name.clone()
    }

    fn compute(&self, request: &ExamineRequest) -> Result<ResultBundle> {
        let result = self.analyze(request)?;
        let variable = &request.variable;
        let options = &request.options;
        let mut bundle = ResultBundle::new();
        bundle.push(case_processing_table(variable, &result.summary));
        bundle.push(descriptives_table(variable, options, &result));
        if options.m_estimators {
            bundle.push(m_estimators_table(variable, &result));
        }
        bundle.push(percentiles_table(variable, options, &result));
        bundle.push(extreme_values_table(variable, &result));
        bundle.push(outliers_table(variable, &result));
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extremes::OutlierKind;
    use approx::assert_relative_eq;
    use tabstat_core::CellValue;

    fn calculator() -> ExamineCalculator {
        ExamineCalculator::new(ScalarPrimitives::new())
    }

    fn numbers(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|&v| CellValue::Number(v)).collect()
    }

    #[test]
    fn test_descriptives_one_to_five() {
        let request = ExamineRequest::new(Variable::numeric("x"), numbers(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        let result = calculator().analyze(&request).unwrap();
        assert_relative_eq!(result.trimmed_mean.unwrap(), 3.0, epsilon = 1e-12);
        assert_eq!(result.median, Some(3.0));
        assert_eq!(result.interquartile_range, Some(3.0));

        let (lo, hi) = result.confidence_interval.unwrap();
        // t(0.975, 4) = 2.776445
        let half = 2.776_445_105_197_799 * (2.5f64 / 5.0).sqrt();
        assert_relative_eq!(lo, 3.0 - half, epsilon = 1e-6);
        assert_relative_eq!(hi, 3.0 + half, epsilon = 1e-6);

        let bundle = calculator().compute(&request).unwrap();
        let table = bundle.table("Descriptives").unwrap();
        assert_eq!(table.number(&["x", "Mean"], "Statistic"), Some(3.0));
        assert_eq!(table.number(&["x", "5% Trimmed Mean"], "Statistic"), Some(3.0));
        assert!(table.number(&["x", "95% Confidence Interval for Mean", "Lower Bound"], "Statistic").is_some());
        assert!(table.number(&["x", "Skewness"], "Std. Error").is_some());
    }

    #[test]
    fn test_all_tables_emitted() {
        let request = ExamineRequest::new(Variable::numeric("x"), numbers(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        let bundle = calculator().compute(&request).unwrap();
        let titles: Vec<&str> = bundle.tables.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Case Processing Summary",
                "Descriptives",
                "M-Estimators",
                "Percentiles",
                "Extreme Values",
                "Outliers"
            ]
        );
        let m = bundle.table("M-Estimators").unwrap();
        assert_eq!(m.column_headers.len(), 4);
        assert_eq!(m.footnotes.len(), 4);
        assert_relative_eq!(m.number(&["x"], "Huber's M-Estimator").unwrap(), 3.0, epsilon = 1e-9);

        let p = bundle.table("Percentiles").unwrap();
        assert_eq!(p.column_headers, vec!["5", "10", "25", "50", "75", "90", "95"]);
        assert_eq!(p.number(&["Tukey's Hinges", "x"], "25"), Some(2.0));
        assert_eq!(p.number(&["Tukey's Hinges", "x"], "75"), Some(4.0));
        assert_eq!(p.row(&["Tukey's Hinges", "x"]).unwrap().get("5"), Some(&Cell::Empty));
        assert_eq!(p.number(&["Weighted Average(Definition 1)", "x"], "25"), Some(1.5));
    }

    #[test]
    fn test_hinges_kept_with_custom_percentiles() {
        let options = ExamineOptions {
            percentiles: vec![10.0, 100.0 / 3.0],
            ..Default::default()
        };
        let request =
            ExamineRequest::new(Variable::numeric("x"), numbers(&[1.0, 2.0, 3.0, 4.0, 5.0])).with_options(options);
        let bundle = calculator().compute(&request).unwrap();
        let p = bundle.table("Percentiles").unwrap();
        assert_eq!(p.column_headers, vec!["10", "25", "33.3333", "50", "75"]);
        assert_eq!(p.number(&["Tukey's Hinges", "x"], "25"), Some(2.0));
        assert_eq!(p.number(&["Tukey's Hinges", "x"], "50"), Some(3.0));
        assert_eq!(p.number(&["Tukey's Hinges", "x"], "75"), Some(4.0));
        assert_eq!(p.row(&["Tukey's Hinges", "x"]).unwrap().get("33.3333"), Some(&Cell::Empty));
        assert_eq!(p.number(&["Weighted Average(Definition 1)", "x"], "50"), Some(3.0));
    }

    #[test]
    fn test_extremes_with_case_numbers() {
        let data = vec![
            CellValue::from(4.0),
            CellValue::Missing,
            CellValue::from(9.0),
            CellValue::from(1.0),
            CellValue::from(9.0),
        ];
        let request = ExamineRequest::new(Variable::numeric("x"), data).with_case_numbers(vec![11, 12, 13, 14, 15]);
        let bundle = calculator().compute(&request).unwrap();
        let table = bundle.table("Extreme Values").unwrap();
        assert_eq!(table.number(&["x", "Highest", "1"], "Case Number"), Some(13.0));
        assert_eq!(table.number(&["x", "Highest", "2"], "Case Number"), Some(15.0));
        assert_eq!(table.number(&["x", "Lowest", "1"], "Case Number"), Some(14.0));
        assert_eq!(table.number(&["x", "Lowest", "1"], "Value"), Some(1.0));
        // four valid cases, listed at both ends
        assert!(table.row(&["x", "Highest", "5"]).is_none());
        assert!(table.row(&["x", "Lowest", "4"]).is_some());
    }

    #[test]
    fn test_outliers() {
        let mut values: Vec<f64> = (1..=20).map(f64::from).collect();
        values.push(45.0);
        values.push(200.0);
        let request = ExamineRequest::new(Variable::numeric("x"), numbers(&values));
        let result = calculator().analyze(&request).unwrap();
        let kinds: Vec<(u64, OutlierKind)> = result.outliers.iter().map(|o| (o.case_number, o.kind)).collect();
        assert_eq!(kinds, vec![(21, OutlierKind::Mild), (22, OutlierKind::Extreme)]);

        let bundle = calculator().compute(&request).unwrap();
        let table = bundle.table("Outliers").unwrap();
        assert_eq!(table.row(&["x", "2"]).unwrap().get("Type"), Some(&Cell::text("Extreme")));
    }

    #[test]
    fn test_small_samples_degrade() {
        for n in 0..5 {
            let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let request = ExamineRequest::new(Variable::numeric("x"), numbers(&values));
            let bundle = calculator().compute(&request).unwrap();
            assert_eq!(bundle.len(), 6);
            let d = bundle.table("Descriptives").unwrap();
            if n < 4 {
                assert_eq!(d.row(&["x", "Kurtosis"]).unwrap().get("Statistic"), Some(&Cell::Empty));
            }
            if n < 2 {
                assert_eq!(
                    d.row(&["x", "95% Confidence Interval for Mean", "Lower Bound"]).unwrap().get("Statistic"),
                    Some(&Cell::Empty)
                );
            }
        }
    }

    #[test]
    fn test_all_missing() {
        let request = ExamineRequest::new(Variable::numeric("x"), vec![CellValue::Missing; 4]);
        let result = calculator().analyze(&request).unwrap();
        assert!(result.moments.is_none());
        assert!(result.m_estimates.iter().all(|m| m.value.is_none()));
        let bundle = calculator().compute(&request).unwrap();
        let cps = bundle.table("Case Processing Summary").unwrap();
        assert_eq!(cps.number(&["x"], "Missing N"), Some(4.0));
        assert_eq!(cps.number(&["x"], "Missing Percent"), Some(100.0));
    }

    #[test]
    fn test_case_number_shape_error() {
        let request = ExamineRequest::new(Variable::numeric("x"), numbers(&[1.0, 2.0])).with_case_numbers(vec![1]);
        assert!(calculator().compute(&request).is_err());
    }

    #[test]
    fn test_m_estimators_disabled() {
        let options = ExamineOptions {
            m_estimators: false,
            ..Default::default()
        };
        let request = ExamineRequest::new(Variable::numeric("x"), numbers(&[1.0, 2.0])).with_options(options);
        let bundle = calculator().compute(&request).unwrap();
        assert!(bundle.table("M-Estimators").is_none());
    }
}
