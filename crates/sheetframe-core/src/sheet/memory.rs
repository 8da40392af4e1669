//! An in-process worksheet.
//!
//! Behaves like the remote service where it matters to the pipelines: reads
//! omit trailing blank cells and rows, writes outside the declared size fail,
//! and user-entered writes are interpreted (leading `'` forces text, numbers
//! and booleans are typed, `=` starts a formula). Every call is recorded.

use dashmap::DashMap;
use sheetframe_engine::engine::{Cell, CellLiteral, CellRef, CellValue};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use super::request::{
    BatchUpdateRequest, UpdateResponse, ValueInputOption, ValueRange, ValueRenderOption,
    ValuesRequest,
};
use super::Worksheet;

/// Failures reported by [`MemoryWorksheet`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("worksheet unavailable: {0}")]
    Unavailable(String),

    #[error("range {range} exceeds grid limits ({rows} rows x {cols} columns)")]
    OutOfBounds {
        range: String,
        rows: usize,
        cols: usize,
    },

    #[error("invalid range '{0}'")]
    InvalidRange(String),
}

/// A call received by a [`MemoryWorksheet`].
#[derive(Clone, Debug, PartialEq)]
pub enum SheetCall {
    ValuesGet(ValuesRequest),
    Resize {
        rows: Option<usize>,
        cols: Option<usize>,
    },
    UpdateCells(BatchUpdateRequest),
}

#[derive(Clone, Debug, PartialEq)]
enum Entry {
    Value(CellValue),
    Formula {
        text: String,
        result: Option<CellValue>,
    },
}

pub struct MemoryWorksheet {
    title: String,
    rows: usize,
    cols: usize,
    cells: DashMap<CellRef, Entry>,
    calls: Mutex<Vec<SheetCall>>,
    unavailable: Option<String>,
}

impl MemoryWorksheet {
    pub fn new(title: impl Into<String>, rows: usize, cols: usize) -> Self {
        MemoryWorksheet {
            title: title.into(),
            rows,
            cols,
            cells: DashMap::new(),
            calls: Mutex::new(Vec::new()),
            unavailable: None,
        }
    }

    /// Fill the top-left corner with rows of text, growing the declared size
    /// if needed. Empty strings leave the cell blank.
    pub fn with_rows(mut self, rows: &[&[&str]]) -> Self {
        for (r, row) in rows.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if !text.is_empty() {
                    self.set(CellRef::new(r, c), CellValue::from(*text));
                }
            }
        }
        self
    }

    /// Store a value directly, bypassing input interpretation.
    pub fn set(&mut self, cell_ref: CellRef, value: CellValue) {
        self.grow_to(cell_ref);
        self.cells.insert(cell_ref, Entry::Value(value));
    }

    /// Store a formula together with the value it evaluates to.
    pub fn set_formula(&mut self, cell_ref: CellRef, formula: &str, result: CellValue) {
        self.grow_to(cell_ref);
        self.cells.insert(
            cell_ref,
            Entry::Formula {
                text: formula.to_string(),
                result: Some(result),
            },
        );
    }

    fn grow_to(&mut self, cell_ref: CellRef) {
        self.rows = self.rows.max(cell_ref.row + 1);
        self.cols = self.cols.max(cell_ref.col + 1);
    }

    /// Make every subsequent call fail with [`MemoryError::Unavailable`].
    pub fn set_unavailable(&mut self, reason: impl Into<String>) {
        self.unavailable = Some(reason.into());
    }

    /// What a user sees in the cell: formula results rather than formula text.
    pub fn value(&self, cell_ref: CellRef) -> Option<CellValue> {
        self.rendered(cell_ref, ValueRenderOption::FormattedValue)
    }

    /// The formula text stored at `cell_ref`, if it holds a formula.
    pub fn formula(&self, cell_ref: CellRef) -> Option<String> {
        match self.cells.get(&cell_ref)?.value() {
            Entry::Formula { text, .. } => Some(text.clone()),
            Entry::Value(_) => None,
        }
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn record(&self, call: SheetCall) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }

    fn check_available(&self) -> Result<(), MemoryError> {
        match &self.unavailable {
            Some(reason) => Err(MemoryError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn rendered(&self, cell_ref: CellRef, render: ValueRenderOption) -> Option<CellValue> {
        Some(render_entry(self.cells.get(&cell_ref)?.value(), render))
    }

    fn apply(&self, start: CellRef, values: &[CellLiteral], input: ValueInputOption) {
        for (offset, literal) in values.iter().enumerate() {
            let cell_ref = CellRef::new(start.row, start.col + offset);
            match interpret(literal, input) {
                Some(entry) => {
                    self.cells.insert(cell_ref, entry);
                }
                None => {
                    self.cells.remove(&cell_ref);
                }
            }
        }
    }
}

fn render_entry(entry: &Entry, render: ValueRenderOption) -> CellValue {
    match entry {
        Entry::Value(v) => v.clone(),
        Entry::Formula { text, .. } if render == ValueRenderOption::Formula => {
            CellValue::Text(text.clone())
        }
        Entry::Formula { text, result } => result
            .clone()
            .unwrap_or_else(|| CellValue::Text(text.clone())),
    }
}

/// How the service stores a submitted literal. None clears the cell.
fn interpret(literal: &CellLiteral, input: ValueInputOption) -> Option<Entry> {
    let text = match literal {
        CellLiteral::Int(n) => return Some(Entry::Value(CellValue::Number(*n as f64))),
        CellLiteral::Float(n) => return Some(Entry::Value(CellValue::Number(*n))),
        CellLiteral::Text(s) if s.is_empty() => return None,
        CellLiteral::Text(s) => s,
    };
    if input == ValueInputOption::Raw {
        return Some(Entry::Value(CellValue::Text(text.clone())));
    }

    if let Some(literal_text) = text.strip_prefix('\'') {
        return Some(Entry::Value(CellValue::Text(literal_text.to_string())));
    }
    if text.len() > 1 && text.starts_with('=') {
        return Some(Entry::Formula {
            text: text.clone(),
            result: None,
        });
    }
    let trimmed = text.trim();
    if trimmed.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(n) = trimmed.parse::<f64>() {
            return Some(Entry::Value(CellValue::Number(n)));
        }
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(Entry::Value(CellValue::Bool(true)));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(Entry::Value(CellValue::Bool(false)));
    }
    Some(Entry::Value(CellValue::Text(text.clone())))
}

/// Top-left cell of a sheet-qualified range label such as `'S'!B2:D2`.
fn range_start(range: &str) -> Result<CellRef, MemoryError> {
    let cells = range.rsplit_once('!').map_or(range, |(_, cells)| cells);
    let first = cells.split(':').next().unwrap_or(cells);
    CellRef::parse_a1(first).ok_or_else(|| MemoryError::InvalidRange(range.to_string()))
}

impl Worksheet for MemoryWorksheet {
    type Error = MemoryError;

    fn title(&self) -> &str {
        &self.title
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn col_count(&self) -> usize {
        self.cols
    }

    fn values_get(&self, request: &ValuesRequest) -> Result<ValueRange, MemoryError> {
        self.record(SheetCall::ValuesGet(request.clone()));
        self.check_available()?;

        let mut rendered: Vec<(CellRef, CellValue)> = self
            .cells
            .iter()
            .filter_map(|entry| {
                let value = render_entry(entry.value(), request.value_render_option);
                (!value.is_blank()).then_some((*entry.key(), value))
            })
            .collect();
        rendered.sort_by_key(|(cell_ref, _)| *cell_ref);

        let mut values: Vec<Vec<CellValue>> = Vec::new();
        for (cell_ref, value) in rendered {
            if values.len() <= cell_ref.row {
                values.resize_with(cell_ref.row + 1, Vec::new);
            }
            let row = &mut values[cell_ref.row];
            if row.len() <= cell_ref.col {
                row.resize_with(cell_ref.col + 1, CellValue::default);
            }
            row[cell_ref.col] = value;
        }

        let last_col = values.iter().map(Vec::len).max().unwrap_or(0);
        let range = if values.is_empty() {
            format!("'{}'", self.title.replace('\'', "''"))
        } else {
            CellRef::range_label(
                &self.title,
                CellRef::new(0, 0),
                CellRef::new(values.len() - 1, last_col.saturating_sub(1)),
            )
        };

        Ok(ValueRange {
            range: Some(range),
            major_dimension: Some("ROWS".to_string()),
            values,
        })
    }

    fn resize(&mut self, rows: Option<usize>, cols: Option<usize>) -> Result<(), MemoryError> {
        self.record(SheetCall::Resize { rows, cols });
        self.check_available()?;

        if let Some(rows) = rows {
            self.rows = rows;
        }
        if let Some(cols) = cols {
            self.cols = cols;
        }
        let (max_rows, max_cols) = (self.rows, self.cols);
        self.cells
            .retain(|cell_ref, _| cell_ref.row < max_rows && cell_ref.col < max_cols);
        Ok(())
    }

    fn update_cells(
        &mut self,
        cells: &[Cell],
        input: ValueInputOption,
    ) -> Result<UpdateResponse, MemoryError> {
        let request = BatchUpdateRequest::from_cells(&self.title, cells, input);
        self.record(SheetCall::UpdateCells(request.clone()));
        self.check_available()?;

        if let Some(cell) = cells.iter().find(|c| c.row > self.rows || c.col > self.cols) {
            return Err(MemoryError::OutOfBounds {
                range: cell
                    .cell_ref()
                    .map_or_else(|| format!("R{}C{}", cell.row, cell.col), |r| r.to_string()),
                rows: self.rows,
                cols: self.cols,
            });
        }

        let mut response = UpdateResponse {
            spreadsheet_id: None,
            total_updated_rows: 0,
            total_updated_columns: 0,
            total_updated_cells: request.cell_count(),
        };
        let mut touched_rows = std::collections::BTreeSet::new();
        let mut touched_cols = std::collections::BTreeSet::new();
        for update in &request.data {
            let start = range_start(&update.range)?;
            for (offset, row) in update.values.iter().enumerate() {
                let row_start = CellRef::new(start.row + offset, start.col);
                touched_rows.insert(row_start.row);
                touched_cols.extend(row_start.col..row_start.col + row.len());
                self.apply(row_start, row, request.value_input_option);
            }
        }
        response.total_updated_rows = touched_rows.len();
        response.total_updated_columns = touched_cols.len();
        Ok(response)
    }
}
