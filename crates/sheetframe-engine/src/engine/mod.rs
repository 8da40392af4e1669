//! Cell-level API.
//!
//! - [`CellRef`] - A1 notation <-> 0-indexed row/col, range labels
//! - [`CellValue`] - a cell value as the remote spreadsheet returns it
//! - [`Cell`] - a planned cell write (1-indexed row/col + literal)
//! - [`SparseCellSet`], [`DenseGrid`], [`fill_gaps`] - sparse to rectangular grids
//! - [`Value`] - a table value
//! - [`CellLiteral`], [`StringEscaping`], [`serialize_cell`] - table value to cell literal

mod cell;
mod cell_ref;
mod escaping;
mod grid;
mod literal;
mod value;

pub use cell::{Cell, CellValue};
pub use cell_ref::CellRef;
pub use escaping::{EscapingConfig, StringEscaping};
pub use grid::{DenseGrid, SparseCellSet, fill_gaps};
pub use literal::{CellLiteral, serialize_cell};
pub use value::{DATETIME_FORMAT, Value};
