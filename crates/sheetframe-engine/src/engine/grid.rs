//! Sparse and dense cell grids.
//!
//! A read from the remote spreadsheet omits trailing blank cells in each row
//! and trailing blank rows entirely. [`fill_gaps`] turns such a
//! [`SparseCellSet`] into a [`DenseGrid`] where every row has the same length
//! and every missing cell is an empty string.

use std::collections::BTreeMap;

use super::cell::CellValue;
use super::cell_ref::CellRef;

/// A partial mapping from cell position to its text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseCellSet {
    cells: BTreeMap<CellRef, String>,
    max_row: usize,
    max_col: usize,
}

impl SparseCellSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a ragged read payload (row-major, starting at A1).
    /// Every value present in the payload is kept, blanks included.
    pub fn from_ragged(values: Vec<Vec<CellValue>>) -> Self {
        let mut set = Self::new();
        for (row_idx, row) in values.into_iter().enumerate() {
            for (col_idx, value) in row.into_iter().enumerate() {
                set.insert_ref(CellRef::new(row_idx, col_idx), value.to_grid_string());
            }
        }
        set
    }

    /// Insert a value at a 1-indexed (row, col). Returns false, and stores
    /// nothing, if either coordinate is 0.
    pub fn insert(&mut self, row: usize, col: usize, value: impl Into<String>) -> bool {
        match CellRef::from_one_based(row, col) {
            Some(cell_ref) => {
                self.insert_ref(cell_ref, value.into());
                true
            }
            None => false,
        }
    }

    fn insert_ref(&mut self, cell_ref: CellRef, value: String) {
        let (row, col) = cell_ref.to_one_based();
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self.cells.insert(cell_ref, value);
    }

    /// Value at a 1-indexed (row, col), if present.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        let cell_ref = CellRef::from_one_based(row, col)?;
        self.cells.get(&cell_ref).map(String::as_str)
    }

    /// Highest 1-indexed row present, or 0 when empty.
    pub fn max_row(&self) -> usize {
        self.max_row
    }

    /// Highest 1-indexed column present, or 0 when empty.
    pub fn max_col(&self) -> usize {
        self.max_col
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A rectangular, row-major grid of cell text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DenseGrid {
    rows: Vec<Vec<String>>,
    cols: usize,
}

impl DenseGrid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Zero-indexed access.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

/// Fill a sparse cell set out to a rectangle of at least `min_rows` x `min_cols`.
///
/// The result has `max(min_rows, set.max_row())` rows, each
/// `max(min_cols, set.max_col())` long. Cells missing from the set are empty
/// strings.
pub fn fill_gaps(set: &SparseCellSet, min_rows: usize, min_cols: usize) -> DenseGrid {
    let rows = min_rows.max(set.max_row);
    let cols = min_cols.max(set.max_col);
    tracing::trace!(rows, cols, present = set.len(), "filling grid gaps");

    let mut grid = vec![vec![String::new(); cols]; rows];
    for (cell_ref, value) in &set.cells {
        if let Some(slot) = grid
            .get_mut(cell_ref.row)
            .and_then(|row| row.get_mut(cell_ref.col))
        {
            slot.clone_from(value);
        }
    }

    DenseGrid { rows: grid, cols }
}
