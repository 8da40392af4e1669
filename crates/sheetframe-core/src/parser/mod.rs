//! Rows of cell text -> [`Table`].
//!
//! [`TextParser`] is the seam for the row/column parser the read pipeline
//! delegates to. [`RowParser`] is the bundled implementation; it understands
//! the option surface in [`ParserOptions`] (header rows, index columns, dtype
//! overrides, row limits, null markers).

mod infer;
mod rows;

pub use rows::RowParser;

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{Result, SheetframeError};
use crate::table::Table;

/// A parser that turns rectangular rows of text into a table.
pub trait TextParser {
    /// Parser version as `MAJOR.MINOR.PATCH`.
    fn version(&self) -> &str;

    fn parse(&self, rows: Vec<Vec<String>>, options: &ParserOptions) -> Result<Table>;
}

/// Which rows hold column labels (0-indexed, counted after `skiprows` and
/// blank-line removal).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Header {
    /// Row 0, unless explicit `names` are given.
    #[default]
    Infer,
    /// No header; columns are labeled 0..n.
    None,
    Row(usize),
    /// Several rows, forming multi-level column labels.
    Rows(Vec<usize>),
}

impl Header {
    /// Header row positions, ascending.
    pub(crate) fn positions(&self, has_names: bool) -> Vec<usize> {
        match self {
            Header::Infer if has_names => vec![],
            Header::Infer => vec![0],
            Header::None => vec![],
            Header::Row(n) => vec![*n],
            Header::Rows(rows) => {
                let mut rows = rows.clone();
                rows.sort_unstable();
                rows.dedup();
                rows
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeaderRepr {
    Row(usize),
    Rows(Vec<usize>),
    Keyword(String),
}

impl<'de> Deserialize<'de> for Header {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match HeaderRepr::deserialize(deserializer)? {
            HeaderRepr::Row(n) => Ok(Header::Row(n)),
            HeaderRepr::Rows(rows) => Ok(Header::Rows(rows)),
            HeaderRepr::Keyword(k) if k == "infer" => Ok(Header::Infer),
            HeaderRepr::Keyword(k) if k == "none" => Ok(Header::None),
            HeaderRepr::Keyword(k) => Err(serde::de::Error::custom(format!(
                "header must be a row number, a list of rows, 'infer' or 'none', got '{}'",
                k
            ))),
        }
    }
}

/// Column type overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Str,
    Int,
    Float,
    Bool,
    DateTime,
}

/// Null markers recognised when `keep_default_na` is set.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#NA", "N/A", "NA", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None",
];

/// Options for [`TextParser::parse`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    pub header: Header,
    /// Explicit column labels; replaces any header row.
    pub names: Option<Vec<String>>,
    /// Columns (0-indexed) that form the row index.
    pub index_col: Vec<usize>,
    /// Per-column type overrides, keyed by column label.
    pub dtype: HashMap<String, DType>,
    /// Maximum number of data rows to read.
    pub nrows: Option<usize>,
    /// Leading rows to drop before anything else.
    pub skiprows: usize,
    /// Extra strings read as null.
    pub na_values: Vec<String>,
    pub keep_default_na: bool,
    /// Drop rows whose cells are all empty.
    pub skip_blank_lines: bool,
    /// Infer int/float/bool columns; otherwise every column is text.
    pub infer_types: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            header: Header::Infer,
            names: None,
            index_col: Vec::new(),
            dtype: HashMap::new(),
            nrows: None,
            skiprows: 0,
            na_values: Vec::new(),
            keep_default_na: true,
            skip_blank_lines: true,
            infer_types: true,
        }
    }
}

impl ParserOptions {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(SheetframeError::from)
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_index_col(mut self, cols: impl IntoIterator<Item = usize>) -> Self {
        self.index_col = cols.into_iter().collect();
        self
    }

    pub fn with_dtype(mut self, column: impl Into<String>, dtype: DType) -> Self {
        self.dtype.insert(column.into(), dtype);
        self
    }

    pub fn with_nrows(mut self, nrows: usize) -> Self {
        self.nrows = Some(nrows);
        self
    }

    pub fn with_skiprows(mut self, skiprows: usize) -> Self {
        self.skiprows = skiprows;
        self
    }

    pub fn with_na_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.na_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keep_default_na(mut self, keep: bool) -> Self {
        self.keep_default_na = keep;
        self
    }

    pub fn with_skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    pub fn with_infer_types(mut self, infer: bool) -> Self {
        self.infer_types = infer;
        self
    }

    /// Is `s` a null marker under these options?
    pub(crate) fn is_na(&self, s: &str) -> bool {
        (self.keep_default_na && DEFAULT_NA_VALUES.contains(&s))
            || self.na_values.iter().any(|v| v == s)
    }
}
