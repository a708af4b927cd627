//! Uniform pivot-table result bundle
//!
//! Every calculator projects its output into `ResultBundle { tables }`. A row
//! carries a hierarchical `rowHeader` path plus named cells keyed by column
//! header; the named cells are flattened into the row object on the wire:
//!
//! ```json
//! {"rowHeader": ["Valid", "1"], "Frequency": 3, "Percent": 60.0}
//! ```

use crate::validity::CaseSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Columns of every `Case Processing Summary` table
pub const CASE_PROCESSING_COLUMNS: [&str; 6] =
    ["Valid N", "Valid Percent", "Missing N", "Missing Percent", "Total N", "Total Percent"];

/// One cell of a result table
///
/// Serializes as a JSON number, a JSON string, or `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    /// Numeric cell; non-finite values become blank
    pub fn number(v: f64) -> Self {
        if v.is_finite() {
            Cell::Number(v)
        } else {
            Cell::Empty
        }
    }

    /// Numeric cell for a statistic that may not be computable
    pub fn opt(v: Option<f64>) -> Self {
        v.map_or(Cell::Empty, Cell::number)
    }

    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn count(n: usize) -> Self {
        Cell::Number(n as f64)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::number(v)
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        Cell::opt(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    /// Header path from outermost to innermost grouping; `null` leaves a
    /// level blank
    #[serde(rename = "rowHeader")]
    pub row_header: Vec<Option<String>>,
    #[serde(flatten)]
    pub cells: BTreeMap<String, Cell>,
}

impl Row {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            row_header: header.into_iter().map(|s| Some(s.into())).collect(),
            cells: BTreeMap::new(),
        }
    }

    /// Row whose header path may contain blank levels
    pub fn with_header(row_header: Vec<Option<String>>) -> Self {
        Self {
            row_header,
            cells: BTreeMap::new(),
        }
    }

    pub fn cell(mut self, column: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Numeric content of a cell, `None` when blank or absent
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Cell::as_number)
    }

    /// Does the header path match, level by level?
    pub fn header_is(&self, path: &[&str]) -> bool {
        self.row_header.len() == path.len()
            && self
                .row_header
                .iter()
                .zip(path)
                .all(|(h, p)| h.as_deref() == Some(*p))
    }
}

/// A titled pivot table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub title: String,
    pub column_headers: Vec<String>,
    pub rows: Vec<Row>,
    #[serde(default)]
    pub footnotes: Vec<String>,
}

impl Table {
    pub fn new<I, S>(title: impl Into<String>, column_headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            column_headers: column_headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            footnotes: Vec::new(),
        }
    }

    /// `Case Processing Summary` with one row labelled `label`
    ///
    /// Counts are weighted; cases dropped for an unusable weight are not
    /// part of the total.
    pub fn case_processing(label: &str, summary: &CaseSummary) -> Self {
        let total = summary.total_weight();
        let missing = summary.missing_weight();
        let mut table = Self::new("Case Processing Summary", CASE_PROCESSING_COLUMNS);
        table.push(
            Row::new([label])
                .cell("Valid N", summary.valid_weight)
                .cell("Valid Percent", crate::percent(summary.valid_weight, total))
                .cell("Missing N", missing)
                .cell("Missing Percent", crate::percent(missing, total))
                .cell("Total N", total)
                .cell("Total Percent", crate::percent(total, total)),
        );
        table
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn footnote(&mut self, note: impl Into<String>) {
        self.footnotes.push(note.into());
    }

    /// First row whose header path equals `path`
    pub fn row(&self, path: &[&str]) -> Option<&Row> {
        self.rows.iter().find(|r| r.header_is(path))
    }

    /// Numeric cell at `(path, column)`
    pub fn number(&self, path: &[&str], column: &str) -> Option<f64> {
        self.row(path).and_then(|r| r.number(column))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything one calculator run produces
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultBundle {
    pub tables: Vec<Table>,
}

impl ResultBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// First table with the given title
    pub fn table(&self, title: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.title == title)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<Table> for ResultBundle {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
