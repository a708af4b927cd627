//! Extreme values and boxplot outliers

use serde::Serialize;
use std::cmp::Ordering;

/// A valid case identified by its case number
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseValue {
    pub case_number: u64,
    pub value: f64,
}

/// The highest and lowest cases of a sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extremes {
    /// Value descending, ties by ascending case number
    pub highest: Vec<CaseValue>,
    /// Value ascending, ties by ascending case number
    pub lowest: Vec<CaseValue>,
}

/// Up to `count` cases from each end; fewer when the sample is short
pub fn extreme_values(cases: &[CaseValue], count: usize) -> Extremes {
    let mut sorted = cases.to_vec();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.case_number.cmp(&b.case_number)));
    let highest = sorted.iter().take(count).copied().collect();
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value).then(a.case_number.cmp(&b.case_number)));
    let lowest = sorted.iter().take(count).copied().collect();
    Extremes { highest, lowest }
}

/// Distance class of an outlier from the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierKind {
    /// Between 1.5 and 3 box lengths outside
    Mild,
    /// More than 3 box lengths outside
    Extreme,
}

impl OutlierKind {
    pub fn label(&self) -> &'static str {
        match self {
            OutlierKind::Mild => "Mild",
            OutlierKind::Extreme => "Extreme",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outlier {
    pub case_number: u64,
    pub value: f64,
    pub kind: OutlierKind,
}

/// Box edges and the fences derived from them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fences {
    pub q1: f64,
    pub q3: f64,
}

impl Fences {
    pub fn new(q1: f64, q3: f64) -> Self {
        Self { q1, q3 }
    }

    pub fn box_length(&self) -> f64 {
        self.q3 - self.q1
    }

    /// `None` for values inside the inner fences
    pub fn classify(&self, value: f64) -> Option<OutlierKind> {
        let step = self.box_length();
        let distance = if value < self.q1 {
            self.q1 - value
        } else if value > self.q3 {
            value - self.q3
        } else {
            return None;
        };
        if distance > 3.0 * step {
            Some(OutlierKind::Extreme)
        } else if distance > 1.5 * step {
            Some(OutlierKind::Mild)
        } else {
            None
        }
    }
}

/// Cases outside the inner fences, by ascending value then case number
pub fn find_outliers(cases: &[CaseValue], fences: Fences) -> Vec<Outlier> {
    let mut outliers: Vec<Outlier> = cases
        .iter()
        .filter_map(|c| {
            fences.classify(c.value).map(|kind| Outlier {
                case_number: c.case_number,
                value: c.value,
                kind,
            })
        })
        .collect();
    outliers.sort_by(|a, b| match a.value.total_cmp(&b.value) {
        Ordering::Equal => a.case_number.cmp(&b.case_number),
        other => other,
    });
    outliers
}
