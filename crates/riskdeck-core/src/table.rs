//! Flat row/column tables for downstream display.
//!
//! Projections reshape canonical results into a [`Table`]; no computation
//! happens at this layer. Rendering (notebooks, terminals, charts) is left to
//! callers.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Text value (identifiers, sector levels, factor names).
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Calendar date.
    Date(NaiveDate),
    /// Boolean flag.
    Flag(bool),
    /// Value not available (serialized as `null`).
    Missing,
}

impl Cell {
    /// Numeric value, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value, if this is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Flag value, if this is a flag.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Cell::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns true for [`Cell::Missing`].
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Missing, Cell::Number)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Flag(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Flag(b) => write!(f, "{b}"),
            Cell::Missing => Ok(()),
        }
    }
}

/// A named-column table.
///
/// The leading `index_columns` identify a row (e.g. `sectorLevel1..N`,
/// `factor`); the rest are values.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    index_columns: usize,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates an empty table whose first `index_columns` columns form the row key.
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, index_columns: usize) -> Self {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let index_columns = index_columns.min(columns.len());
        Self {
            columns,
            index_columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    ///
    /// Rows shorter than the header are padded with [`Cell::Missing`];
    /// extra cells are dropped, in every build profile.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    /// Column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Names of the row-key columns.
    #[must_use]
    pub fn index_columns(&self) -> &[String] {
        &self.columns[..self.index_columns]
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in column `name`.
    #[must_use]
    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let col = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of a column, top to bottom.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Rows for which `predicate` holds, as a new table with the same header.
    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> Table
    where
        F: Fn(&[Cell]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            index_columns: self.index_columns,
            rows: self
                .rows
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }
}
