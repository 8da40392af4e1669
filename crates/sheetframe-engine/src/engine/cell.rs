//! Cell data structures exchanged with the remote spreadsheet.
//!
//! - [`CellValue`] - a value as returned by a read (text, number or boolean)
//! - [`Cell`] - a single write: 1-indexed position plus the literal to submit

use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;
use super::literal::CellLiteral;

/// A cell value as it appears in a read payload.
///
/// Decodes untagged from the JSON `values` array, so `"x"`, `3.5` and `true`
/// all map directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }

    /// Text form used in a dense grid.
    /// Integral numbers print without a fraction; booleans as `TRUE`/`FALSE`.
    pub fn to_grid_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Number(n) => format_number(*n),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Format a number for the dense grid.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// A planned write: 1-indexed (row, col) and the literal to submit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: CellLiteral,
}

impl Cell {
    pub fn new(row: usize, col: usize, value: CellLiteral) -> Cell {
        Cell { row, col, value }
    }

    /// Zero-indexed reference, or None if either coordinate is 0.
    pub fn cell_ref(&self) -> Option<CellRef> {
        CellRef::from_one_based(self.row, self.col)
    }
}
