//! Labeled two-dimensional tables.

mod index;

pub use index::Index;

use sheetframe_engine::engine::Value;

use crate::error::{Result, SheetframeError};

/// A table of values with column labels and a row index (row-major storage).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Index,
    index: Index,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, checking that `rows` matches the labels' shape.
    pub fn new(columns: Index, index: Index, rows: Vec<Vec<Value>>) -> Result<Table> {
        if index.len() != rows.len() {
            return Err(SheetframeError::invalid(
                "index",
                format!("index has {} labels for {} rows", index.len(), rows.len()),
            ));
        }
        if let Some(pos) = rows.iter().position(|r| r.len() != columns.len()) {
            return Err(SheetframeError::invalid(
                "rows",
                format!(
                    "row {} has {} values, expected {}",
                    pos,
                    rows[pos].len(),
                    columns.len()
                ),
            ));
        }
        Ok(Table { columns, index, rows })
    }

    /// Build a table with named columns and a `0..n` index.
    pub fn from_rows<S: AsRef<str>>(columns: &[S], rows: Vec<Vec<Value>>) -> Result<Table> {
        let index = Index::range(rows.len());
        Table::new(Index::from_names(columns), index, rows)
    }

    /// Replace the row index.
    pub fn with_index(self, index: Index) -> Result<Table> {
        Table::new(self.columns, index, self.rows)
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn columns(&self) -> &Index {
        &self.columns
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row(&self, pos: usize) -> Option<&[Value]> {
        self.rows.get(pos).map(Vec::as_slice)
    }

    /// Values of the column labeled `name`.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let col = self.columns.position(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.columns.position(column)?;
        self.rows.get(row)?.get(col)
    }
}
