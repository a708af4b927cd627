//! Weighted two-way contingency table

use tabstat_core::{percent, ValueKey};
use tabstat_frequency::distinct_sorted;

/// Observed weighted counts with their marginals
///
/// Categories on both axes are the distinct valid values in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct Contingency {
    pub row_keys: Vec<ValueKey>,
    pub col_keys: Vec<ValueKey>,
    /// `counts[i][j]` is the weight of cases in row `i` and column `j`
    pub counts: Vec<Vec<f64>>,
    pub row_totals: Vec<f64>,
    pub col_totals: Vec<f64>,
    pub total: f64,
}

impl Contingency {
    /// Tabulate aligned row and column keys
    pub fn build(rows: &[ValueKey], cols: &[ValueKey], weights: &[f64]) -> Self {
        debug_assert!(rows.len() == cols.len() && cols.len() == weights.len());
        let row_keys: Vec<ValueKey> = distinct_sorted(rows, weights).into_iter().map(|g| g.key).collect();
        let col_keys: Vec<ValueKey> = distinct_sorted(cols, weights).into_iter().map(|g| g.key).collect();

        let mut counts = vec![vec![0.0; col_keys.len()]; row_keys.len()];
        for ((r, c), &w) in rows.iter().zip(cols).zip(weights) {
            // both keys were collected from these same slices
            if let (Ok(i), Ok(j)) = (row_keys.binary_search(r), col_keys.binary_search(c)) {
                counts[i][j] += w;
            }
        }

        let row_totals: Vec<f64> = counts.iter().map(|row| row.iter().sum()).collect();
        let col_totals: Vec<f64> = (0..col_keys.len())
            .map(|j| counts.iter().map(|row| row[j]).sum())
            .collect();
        let total = row_totals.iter().sum();
        Self {
            row_keys,
            col_keys,
            counts,
            row_totals,
            col_totals,
            total,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.row_keys.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total <= 0.0
    }

    pub fn is_2x2(&self) -> bool {
        self.n_rows() == 2 && self.n_cols() == 2
    }

    /// Both axes have at least two categories
    pub fn has_variation(&self) -> bool {
        self.n_rows() >= 2 && self.n_cols() >= 2
    }

    /// `(r − 1)(c − 1)`
    pub fn degrees_of_freedom(&self) -> usize {
        self.n_rows().saturating_sub(1) * self.n_cols().saturating_sub(1)
    }

    /// Expected count under independence, `R·C/N`
    pub fn expected(&self, i: usize, j: usize) -> f64 {
        if self.total > 0.0 {
            self.row_totals[i] * self.col_totals[j] / self.total
        } else {
            0.0
        }
    }

    pub fn residual(&self, i: usize, j: usize) -> f64 {
        self.counts[i][j] - self.expected(i, j)
    }

    /// `(O − E) / √E`
    pub fn standardized_residual(&self, i: usize, j: usize) -> Option<f64> {
        let e = self.expected(i, j);
        (e > 0.0).then(|| self.residual(i, j) / e.sqrt())
    }

    /// `(O − E) / √(E (1 − R/N)(1 − C/N))`
    pub fn adjusted_residual(&self, i: usize, j: usize) -> Option<f64> {
        if self.total <= 0.0 {
            return None;
        }
        let e = self.expected(i, j);
        let variance = e * (1.0 - self.row_totals[i] / self.total) * (1.0 - self.col_totals[j] / self.total);
        (variance > 0.0).then(|| self.residual(i, j) / variance.sqrt())
    }

    pub fn row_percent(&self, i: usize, j: usize) -> Option<f64> {
        percent(self.counts[i][j], self.row_totals[i])
    }

    pub fn col_percent(&self, i: usize, j: usize) -> Option<f64> {
        percent(self.counts[i][j], self.col_totals[j])
    }

    pub fn total_percent(&self, i: usize, j: usize) -> Option<f64> {
        percent(self.counts[i][j], self.total)
    }

    /// Smallest expected count over all cells
    pub fn min_expected(&self) -> Option<f64> {
        self.cells().map(|(i, j)| self.expected(i, j)).reduce(f64::min)
    }

    /// Number of cells with expected count below 5
    pub fn small_expected_cells(&self) -> usize {
        self.cells().filter(|&(i, j)| self.expected(i, j) < 5.0).count()
    }

    /// Every `(row, col)` index pair, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n_rows()).flat_map(move |i| (0..self.n_cols()).map(move |j| (i, j)))
    }
}
