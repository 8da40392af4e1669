//! sheetframe - move tables in and out of spreadsheet worksheets.
//!
//! - [`read_table`] fetches a worksheet, fills the sparse response out to a
//!   rectangle and parses it into a [`Table`].
//! - [`write_table`] / [`write_tables`] serialize tables into cell writes and
//!   submit them as one batch, growing the worksheet as needed.
//!
//! The remote service is reached through the [`Worksheet`] trait;
//! [`MemoryWorksheet`] is an in-process implementation.

pub use sheetframe_core::error::{Result, SheetframeError};
pub use sheetframe_core::parser::{DType, Header, ParserOptions, RowParser, TextParser};
pub use sheetframe_core::read::{
    MIN_PARSER_VERSION, ReadOptions, TableReader, check_parser_version, read_table,
};
pub use sheetframe_core::sheet::{
    BatchUpdateRequest, MemoryError, MemoryWorksheet, SheetCall, UpdateResponse,
    ValueInputOption, ValueRange, ValueRenderOption, ValuesRequest, Worksheet,
};
pub use sheetframe_core::table::{Index, Table};
pub use sheetframe_core::write::{
    UpdatePlan, WriteOptions, plan_updates, resize_to_minimum, write_table, write_tables,
};

pub use sheetframe_engine::EscapingError;
pub use sheetframe_engine::engine::{
    Cell, CellLiteral, CellRef, CellValue, DenseGrid, SparseCellSet, StringEscaping, Value,
    fill_gaps, serialize_cell,
};
