//! Cell reference parsing and formatting.
//!
//! Converts between A1 notation ("A1", "B2", "AA100") and zero-indexed
//! row/column coordinates, and builds sheet-qualified range labels such as
//! `'My Sheet'!B2:D10` for requests against the remote spreadsheet.
//!
//! # Examples
//!
//! ```
//! use sheetframe_engine::engine::CellRef;
//!
//! let cell: CellRef = "B3".parse().unwrap();
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static A1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?<letters>[A-Za-z]+)(?<numbers>[0-9]+)$").unwrap());

/// A reference to a cell by row and column indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Build a reference from the 1-indexed coordinates the spreadsheet API uses.
    /// Returns None for a zero row or column.
    pub fn from_one_based(row: usize, col: usize) -> Option<CellRef> {
        Some(CellRef::new(row.checked_sub(1)?, col.checked_sub(1)?))
    }

    /// The 1-indexed (row, col) pair for this reference.
    pub fn to_one_based(self) -> (usize, usize) {
        (self.row + 1, self.col + 1)
    }

    /// Parse a reference from A1 notation. Returns None if the input is invalid.
    pub fn parse_a1(name: &str) -> Option<CellRef> {
        let caps = A1_RE.captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;
        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(CellRef::new(row, col))
    }

    /// Convert a column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }

    /// A sheet-qualified range label from `start` to `end` (inclusive).
    ///
    /// A single-cell range collapses to one reference. Sheet titles are always
    /// quoted, with embedded quotes doubled.
    pub fn range_label(sheet_title: &str, start: CellRef, end: CellRef) -> String {
        let title = format!("'{}'", sheet_title.replace('\'', "''"));
        if start == end {
            format!("{}!{}", title, start)
        } else {
            format!("{}!{}:{}", title, start, end)
        }
    }
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}
