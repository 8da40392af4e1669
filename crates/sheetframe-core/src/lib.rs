//! sheetframe-core - tables <-> worksheet cell grids.
//!
//! The read pipeline fetches a worksheet's values, fills gaps to a rectangle
//! and parses the rows into a [`Table`]. The write pipeline plans one cell
//! write per table value and submits them in a single batch.

pub mod error;
pub mod parser;
pub mod read;
pub mod sheet;
pub mod table;
pub mod write;

pub use error::{Result, SheetframeError};
pub use parser::{DType, Header, ParserOptions, RowParser, TextParser};
pub use read::{ReadOptions, TableReader, check_parser_version, read_table};
pub use sheet::{MemoryWorksheet, Worksheet};
pub use table::{Index, Table};
pub use write::{UpdatePlan, WriteOptions, plan_updates, resize_to_minimum, write_table, write_tables};

pub use sheetframe_engine::engine::{CellLiteral, CellRef, StringEscaping, Value};
