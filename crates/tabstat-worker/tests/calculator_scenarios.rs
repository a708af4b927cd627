//! Worked scenarios for every calculator, directly and through the dispatcher

use anyhow::Result;
use approx::assert_relative_eq;
use rand::prelude::*;
use rand_distr::Normal;
use serde_json::json;
use tabstat_core::{Calculator, CellValue, ScalarPrimitives, Variable};
use tabstat_crosstabs::{CrosstabsCalculator, CrosstabsRequest};
use tabstat_descriptive::{DescriptiveCalculator, DescriptiveOptions, DescriptiveRequest, DescriptiveStatistic};
use tabstat_frequency::{FrequencyCalculator, FrequencyRequest};
use tabstat_worker::{Dispatcher, Request, Response, WorkerConfig, WorkerPool};

fn numbers(values: &[f64]) -> Vec<CellValue> {
    values.iter().map(|&v| CellValue::Number(v)).collect()
}

#[test]
fn test_letter_grades() -> Result<()> {
    let data = ["A", "B", "A", "A", "C"].map(CellValue::from).to_vec();
    let request = FrequencyRequest::new(Variable::string("grade"), data);
    let result = FrequencyCalculator::new(ScalarPrimitives::new()).analyze(&request)?;
    let percents: Vec<f64> = result.rows.iter().map(|r| r.percent).collect();
    assert_eq!(percents, vec![60.0, 20.0, 20.0]);
    Ok(())
}

#[test]
fn test_one_to_five_moments() -> Result<()> {
    let options = DescriptiveOptions::new(DescriptiveStatistic::ALL);
    let request = DescriptiveRequest::new(Variable::numeric("x"), numbers(&[1.0, 2.0, 3.0, 4.0, 5.0])).with_options(options);
    let bundle = DescriptiveCalculator::new(ScalarPrimitives::new()).compute(&request)?;
    let table = bundle.table("Descriptive Statistics").unwrap();
    assert_eq!(table.number(&["x"], "Mean"), Some(3.0));
    assert_relative_eq!(table.number(&["x"], "Std. Deviation").unwrap(), 2.5f64.sqrt(), epsilon = 1e-12);
    assert_eq!(table.number(&["x"], "Range"), Some(4.0));
    assert_eq!(table.number(&["x"], "Sum"), Some(15.0));
    Ok(())
}

#[test]
fn test_all_missing_is_not_an_error() -> Result<()> {
    let request = DescriptiveRequest::new(Variable::numeric("x"), vec![CellValue::Missing; 3]);
    let bundle = DescriptiveCalculator::new(ScalarPrimitives::new()).compute(&request)?;
    let row = bundle.table("Descriptive Statistics").unwrap().row(&["x"]).unwrap();
    assert_eq!(row.number("N"), Some(0.0));
    assert!(row.get("Mean").unwrap().is_empty());

    let cps = bundle.table("Case Processing Summary").unwrap();
    assert_eq!(cps.number(&["x"], "Valid N"), Some(0.0));
    assert_eq!(cps.number(&["x"], "Missing N"), Some(3.0));
    assert_eq!(cps.number(&["x"], "Total N"), Some(3.0));
    Ok(())
}

#[test]
fn test_balanced_crosstab() -> Result<()> {
    let request = CrosstabsRequest::new(
        Variable::numeric("r"),
        Variable::string("c"),
        numbers(&[1.0, 1.0, 2.0, 2.0]),
        ["x", "y", "x", "y"].map(CellValue::from).to_vec(),
    );
    let result = CrosstabsCalculator::new(ScalarPrimitives::new()).analyze(&request)?;
    assert_eq!(result.table.counts, vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
    assert_eq!(result.pearson.map(|t| t.value), Some(0.0));
    Ok(())
}

#[test]
fn test_unit_weights_match_unweighted_through_protocol() {
    let mut rng = StdRng::seed_from_u64(7);
    let normal = Normal::new(50.0, 10.0).unwrap();
    let data: Vec<f64> = (0..200).map(|_| normal.sample(&mut rng)).collect();
    let dispatcher = Dispatcher::new();
    let plain = dispatcher.handle_value(json!({"kind": "examine", "variable": {"name": "x"}, "data": data}));
    let weighted = dispatcher.handle_value(json!({
        "kind": "examine",
        "variable": {"name": "x"},
        "data": data,
        "weights": vec![1.0; data.len()]
    }));
    assert!(plain.is_success());
    assert_eq!(plain, weighted);
}

#[test]
fn test_batch_of_every_kind() {
    let requests: Vec<Request> = [
        json!({"kind": "frequency", "variable": {"name": "f"}, "data": [1, 2, 2]}),
        json!({"kind": "descriptive", "variable": {"name": "d"}, "data": [1, 2, 2]}),
        json!({"kind": "examine", "variable": {"name": "e"}, "data": [1, 2, 2]}),
        json!({
            "kind": "crosstabs",
            "variable": {"row": {"name": "r"}, "col": {"name": "c"}},
            "data": {"row": [1, 2], "col": [1, 2]}
        }),
    ]
    .into_iter()
    .map(|v| serde_json::from_value(v).unwrap())
    .collect();
    let pool = WorkerPool::new(WorkerConfig::default()).unwrap();
    let results = pool.run_all(requests);
    let keys: Vec<&str> = results.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["d", "e", "f", "r * c"]);
    assert!(results.values().all(Response::is_success));
}
