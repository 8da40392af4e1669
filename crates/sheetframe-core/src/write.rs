//! Table -> worksheet.
//!
//! [`plan_updates`] lays a table out as 1-indexed cell writes anchored at a
//! given row and column; [`write_table`] and [`write_tables`] grow (or
//! resize) the worksheet to fit and submit the plan as one batch.

use serde::Deserialize;
use sheetframe_engine::engine::{Cell, EscapingConfig, StringEscaping, Value, serialize_cell};

use crate::error::{Result, SheetframeError};
use crate::sheet::{ValueInputOption, Worksheet};
use crate::table::Table;

/// Layout and escaping for a write.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "WriteOptionsFile")]
pub struct WriteOptions {
    /// 1-indexed anchor row (upper-left corner).
    pub row: usize,
    /// 1-indexed anchor column.
    pub col: usize,
    /// Write the row index as leading column(s).
    pub include_index: bool,
    /// Write column labels (and index names) before the data.
    pub include_column_header: bool,
    /// Resize the worksheet to exactly fit the write, instead of only growing it.
    pub resize: bool,
    /// Let text starting with `=` be interpreted as a formula.
    pub allow_formulas: bool,
    pub string_escaping: StringEscaping,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            row: 1,
            col: 1,
            include_index: false,
            include_column_header: true,
            resize: false,
            allow_formulas: true,
            string_escaping: StringEscaping::Default,
        }
    }
}

/// Config form of [`WriteOptions`]. The escaping policy stays raw until
/// conversion so a bad policy is a configuration error, not a syntax error.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WriteOptionsFile {
    row: usize,
    col: usize,
    include_index: bool,
    include_column_header: bool,
    resize: bool,
    allow_formulas: bool,
    string_escaping: Option<EscapingConfig>,
}

impl Default for WriteOptionsFile {
    fn default() -> Self {
        let defaults = WriteOptions::default();
        WriteOptionsFile {
            row: defaults.row,
            col: defaults.col,
            include_index: defaults.include_index,
            include_column_header: defaults.include_column_header,
            resize: defaults.resize,
            allow_formulas: defaults.allow_formulas,
            string_escaping: None,
        }
    }
}

impl TryFrom<WriteOptionsFile> for WriteOptions {
    type Error = SheetframeError;

    fn try_from(file: WriteOptionsFile) -> Result<Self> {
        let string_escaping = match file.string_escaping {
            Some(config) => StringEscaping::try_from(config)?,
            None => StringEscaping::default(),
        };
        Ok(WriteOptions {
            row: file.row,
            col: file.col,
            include_index: file.include_index,
            include_column_header: file.include_column_header,
            resize: file.resize,
            allow_formulas: file.allow_formulas,
            string_escaping,
        })
    }
}

impl WriteOptions {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: WriteOptionsFile = toml::from_str(s)?;
        WriteOptions::try_from(file)
    }

    pub fn at(mut self, row: usize, col: usize) -> Self {
        self.row = row;
        self.col = col;
        self
    }

    pub fn with_index(mut self, include: bool) -> Self {
        self.include_index = include;
        self
    }

    pub fn with_column_header(mut self, include: bool) -> Self {
        self.include_column_header = include;
        self
    }

    pub fn with_resize(mut self, resize: bool) -> Self {
        self.resize = resize;
        self
    }

    pub fn with_allow_formulas(mut self, allow: bool) -> Self {
        self.allow_formulas = allow;
        self
    }

    pub fn with_string_escaping(mut self, escaping: StringEscaping) -> Self {
        self.string_escaping = escaping;
        self
    }

    fn check_anchor(&self, row: usize) -> Result<()> {
        if row == 0 {
            return Err(SheetframeError::invalid("row", "anchor rows are 1-indexed"));
        }
        if self.col == 0 {
            return Err(SheetframeError::invalid("col", "anchor columns are 1-indexed"));
        }
        Ok(())
    }
}

/// Ordered cell writes plus the bottom-right corner they reach.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdatePlan {
    cells: Vec<Cell>,
    last_row: usize,
    last_col: usize,
}

impl UpdatePlan {
    fn push(&mut self, row: usize, col: usize, value: &Value, options: &WriteOptions) {
        let literal = serialize_cell(value, options.allow_formulas, &options.string_escaping);
        self.last_row = self.last_row.max(row);
        self.last_col = self.last_col.max(col);
        self.cells.push(Cell::new(row, col, literal));
    }

    /// Append another plan's writes after this one's.
    pub fn extend(&mut self, other: UpdatePlan) {
        self.last_row = self.last_row.max(other.last_row);
        self.last_col = self.last_col.max(other.last_col);
        self.cells.extend(other.cells);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// (last row, last column) written, 1-indexed; None for an empty plan.
    pub fn footprint(&self) -> Option<(usize, usize)> {
        (!self.is_empty()).then_some((self.last_row, self.last_col))
    }
}

/// Plan the writes for `table` with its upper-left corner at (`row`, `col`).
///
/// With `include_column_header`, one header row is emitted per column level;
/// index names (when `include_index` is set) sit on the last header row.
/// Data rows follow in table order, index values first when included.
pub fn plan_updates(table: &Table, row: usize, col: usize, options: &WriteOptions) -> UpdatePlan {
    let mut plan = UpdatePlan::default();
    let index = table.index();
    let columns = table.columns();
    let index_width = if options.include_index { index.nlevels() } else { 0 };
    let mut row = row;

    if options.include_column_header {
        let levels = columns.nlevels();
        for level in 0..levels {
            if options.include_index {
                for (i, name) in index.names().iter().enumerate() {
                    let value = match name {
                        Some(name) if level + 1 == levels => Value::from(name.as_str()),
                        _ => Value::Null,
                    };
                    plan.push(row, col + i, &value, options);
                }
            }
            for (c, value) in columns.level(level).enumerate() {
                plan.push(row, col + index_width + c, value, options);
            }
            row += 1;
        }
    }

    for (r, values) in table.rows().iter().enumerate() {
        if options.include_index {
            if let Some(label) = index.get(r) {
                for (i, value) in label.iter().enumerate() {
                    plan.push(row + r, col + i, value, options);
                }
            }
        }
        for (c, value) in values.iter().enumerate() {
            plan.push(row + r, col + index_width + c, value, options);
        }
    }

    plan
}

/// Grow the worksheet so it has at least `rows` rows and `cols` columns.
/// Issues no call when it is already large enough.
pub fn resize_to_minimum<W: Worksheet>(
    sheet: &mut W,
    rows: Option<usize>,
    cols: Option<usize>,
) -> Result<()> {
    let rows = rows.filter(|&r| r > sheet.row_count());
    let cols = cols.filter(|&c| c > sheet.col_count());
    if rows.is_none() && cols.is_none() {
        tracing::debug!(
            rows = sheet.row_count(),
            cols = sheet.col_count(),
            "worksheet already large enough"
        );
        return Ok(());
    }
    tracing::debug!(?rows, ?cols, "growing worksheet");
    sheet.resize(rows, cols).map_err(SheetframeError::transport)
}

/// Size the worksheet for `plan` and submit it as one user-entered batch.
fn submit<W: Worksheet>(sheet: &mut W, plan: UpdatePlan, options: &WriteOptions) -> Result<()> {
    let Some((last_row, last_col)) = plan.footprint() else {
        tracing::debug!("No updates to perform on worksheet.");
        return Ok(());
    };

    if options.resize {
        tracing::debug!(rows = last_row, cols = last_col, "resizing worksheet to fit");
        sheet
            .resize(Some(last_row), Some(last_col))
            .map_err(SheetframeError::transport)?;
    } else {
        resize_to_minimum(sheet, Some(last_row), Some(last_col))?;
    }

    tracing::debug!("{} cell updates to send", plan.len());
    let response = sheet
        .update_cells(plan.cells(), ValueInputOption::UserEntered)
        .map_err(SheetframeError::transport)?;
    tracing::debug!(?response, "Cell update response");
    Ok(())
}

/// Write `table` to `sheet` anchored at (`options.row`, `options.col`).
pub fn write_table<W: Worksheet>(sheet: &mut W, table: &Table, options: &WriteOptions) -> Result<()> {
    options.check_anchor(options.row)?;
    let plan = plan_updates(table, options.row, options.col, options);
    submit(sheet, plan, options)
}

/// Write several tables to one worksheet in a single batch.
///
/// Each table is anchored at its own row from `rows` and at `options.col`;
/// `options.row` is ignored. One resize covers every table.
pub fn write_tables<W: Worksheet>(
    sheet: &mut W,
    tables: &[Table],
    rows: &[usize],
    options: &WriteOptions,
) -> Result<()> {
    if tables.len() != rows.len() {
        return Err(SheetframeError::invalid(
            "rows",
            format!("{} anchor rows given for {} tables", rows.len(), tables.len()),
        ));
    }
    let mut plan = UpdatePlan::default();
    for (table, &row) in tables.iter().zip(rows) {
        options.check_anchor(row)?;
        plan.extend(plan_updates(table, row, options.col, options));
    }
    submit(sheet, plan, options)
}
