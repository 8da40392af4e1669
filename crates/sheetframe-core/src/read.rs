//! Worksheet -> table.

use regex::Regex;
use serde::Deserialize;
use sheetframe_engine::engine::{DenseGrid, SparseCellSet, fill_gaps};
use std::sync::LazyLock;

use crate::error::{Result, SheetframeError};
use crate::parser::{ParserOptions, RowParser, TextParser};
use crate::sheet::{ValuesRequest, Worksheet};
use crate::table::Table;

/// Oldest parser API this reader works with, as (major, minor).
pub const MIN_PARSER_VERSION: (u64, u64) = (0, 1);

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\..+$").unwrap());

/// Options for [`read_table`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadOptions {
    /// Read computed values instead of formula text.
    pub evaluate_formulas: bool,
    pub parser: ParserOptions,
}

impl ReadOptions {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(SheetframeError::from)
    }

    pub fn with_evaluate_formulas(mut self, evaluate: bool) -> Self {
        self.evaluate_formulas = evaluate;
        self
    }

    pub fn with_parser(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }
}

/// Check a `MAJOR.MINOR.PATCH` parser version against [`MIN_PARSER_VERSION`].
pub fn check_parser_version(version: &str) -> Result<(u64, u64)> {
    let too_old = || SheetframeError::DependencyVersion {
        found: version.to_string(),
        required: format!("{}.{}.0", MIN_PARSER_VERSION.0, MIN_PARSER_VERSION.1),
    };
    let caps = VERSION_RE.captures(version).ok_or_else(too_old)?;
    let major = caps[1].parse::<u64>().map_err(|_| too_old())?;
    let minor = caps[2].parse::<u64>().map_err(|_| too_old())?;
    if (major, minor) < MIN_PARSER_VERSION {
        return Err(too_old());
    }
    Ok((major, minor))
}

/// Reads worksheets into tables through a [`TextParser`].
///
/// Every constructor checks the parser's version, so a reader never holds a
/// parser older than [`MIN_PARSER_VERSION`].
#[derive(Clone, Debug)]
pub struct TableReader<P = RowParser> {
    parser: P,
}

impl TableReader<RowParser> {
    /// A reader using the bundled [`RowParser`].
    pub fn new() -> Result<Self> {
        Self::with_parser(RowParser)
    }
}

impl<P: TextParser> TableReader<P> {
    pub fn with_parser(parser: P) -> Result<Self> {
        check_parser_version(parser.version())?;
        tracing::debug!(version = parser.version(), "table parser version accepted");
        Ok(TableReader { parser })
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Fetch a worksheet's values as a rectangle at least as large as its
    /// declared size.
    pub fn fetch_grid<W: Worksheet>(&self, sheet: &W, evaluate_formulas: bool) -> Result<DenseGrid> {
        let request = ValuesRequest::for_sheet(sheet.title(), evaluate_formulas);
        let range = sheet.values_get(&request).map_err(SheetframeError::transport)?;
        let sparse = SparseCellSet::from_ragged(range.values);
        Ok(fill_gaps(&sparse, sheet.row_count(), sheet.col_count()))
    }

    pub fn read<W: Worksheet>(&self, sheet: &W, options: &ReadOptions) -> Result<Table> {
        let grid = self.fetch_grid(sheet, options.evaluate_formulas)?;
        tracing::debug!(
            sheet = sheet.title(),
            rows = grid.row_count(),
            cols = grid.col_count(),
            "parsing worksheet grid"
        );
        self.parser.parse(grid.into_rows(), &options.parser)
    }
}

/// Read a worksheet into a table with the bundled parser.
pub fn read_table<W: Worksheet>(sheet: &W, options: &ReadOptions) -> Result<Table> {
    TableReader::new()?.read(sheet, options)
}
