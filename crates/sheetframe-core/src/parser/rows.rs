//! The bundled row parser.

use std::collections::HashSet;

use sheetframe_engine::engine::Value;

use super::infer::{convert, infer_dtype};
use super::{DType, ParserOptions, TextParser};
use crate::error::{Result, SheetframeError};
use crate::table::{Index, Table};

/// Parses rows of cell text into a [`Table`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RowParser;

impl RowParser {
    pub fn new() -> Self {
        RowParser
    }
}

/// A source row, tagged with its 1-indexed line number.
struct Line {
    number: usize,
    cells: Vec<String>,
}

impl TextParser for RowParser {
    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn parse(&self, rows: Vec<Vec<String>>, options: &ParserOptions) -> Result<Table> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut lines: Vec<Line> = rows
            .into_iter()
            .enumerate()
            .skip(options.skiprows)
            .map(|(i, mut cells)| {
                cells.resize(width, String::new());
                Line { number: i + 1, cells }
            })
            .collect();
        if options.skip_blank_lines {
            lines.retain(|line| line.cells.iter().any(|c| !c.is_empty()));
        }

        if lines.is_empty() && options.names.is_none() {
            return Ok(Table::default());
        }

        let header_rows = options.header.positions(options.names.is_some());
        if let Some(&last) = header_rows.last() {
            if last >= lines.len() {
                return Err(SheetframeError::invalid(
                    "header",
                    format!("header row {} is past the last row ({} rows)", last, lines.len()),
                ));
            }
        }
        let data_start = header_rows.last().map_or(0, |last| last + 1);

        let column_labels = column_labels(&lines, &header_rows, width, options)?;
        let levels = column_labels.first().map_or(1, Vec::len);

        let data: Vec<&Line> = lines
            .iter()
            .skip(data_start)
            .take(options.nrows.unwrap_or(usize::MAX))
            .collect();

        let mut columns: Vec<Vec<Value>> = Vec::with_capacity(width);
        for (col, label) in column_labels.iter().enumerate() {
            columns.push(parse_column(&data, col, label, options)?);
        }

        check_index_cols(&options.index_col, width)?;
        let index_cols: HashSet<usize> = options.index_col.iter().copied().collect();

        let index = if options.index_col.is_empty() {
            Index::range(data.len())
        } else {
            let labeled = !header_rows.is_empty() || options.names.is_some();
            let names = options
                .index_col
                .iter()
                .map(|&col| index_name(&column_labels[col], labeled))
                .collect();
            let labels = (0..data.len())
                .map(|row| {
                    options
                        .index_col
                        .iter()
                        .map(|&col| columns[col][row].clone())
                        .collect()
                })
                .collect();
            Index::multi(names, labels)?
        };

        let kept: Vec<usize> = (0..width).filter(|c| !index_cols.contains(c)).collect();
        let labels: Vec<Vec<Value>> = kept.iter().map(|&c| column_labels[c].clone()).collect();
        let column_index = Index::multi(vec![None; levels], labels)?;

        let mut columns: Vec<Option<Vec<Value>>> = columns.into_iter().map(Some).collect();
        let kept_columns: Vec<Vec<Value>> = kept
            .iter()
            .filter_map(|&c| columns[c].take())
            .collect();
        let rows = (0..data.len())
            .map(|row| kept_columns.iter().map(|col| col[row].clone()).collect())
            .collect();

        Table::new(column_index, index, rows)
    }
}

/// Labels for every column, one value per header level.
fn column_labels(
    lines: &[Line],
    header_rows: &[usize],
    width: usize,
    options: &ParserOptions,
) -> Result<Vec<Vec<Value>>> {
    if let Some(names) = &options.names {
        if names.len() != width {
            return Err(SheetframeError::invalid(
                "names",
                format!("{} names given for {} columns", names.len(), width),
            ));
        }
        return Ok(dedup(names.clone()).into_iter().map(|n| vec![Value::Text(n)]).collect());
    }

    match header_rows {
        [] => Ok((0..width).map(|c| vec![Value::Int(c as i64)]).collect()),
        [row] => {
            let names = lines[*row]
                .cells
                .iter()
                .enumerate()
                .map(|(c, name)| {
                    if name.is_empty() {
                        format!("Unnamed: {}", c)
                    } else {
                        name.clone()
                    }
                })
                .collect();
            Ok(dedup(names).into_iter().map(|n| vec![Value::Text(n)]).collect())
        }
        rows => Ok((0..width)
            .map(|c| {
                rows.iter()
                    .enumerate()
                    .map(|(level, &row)| {
                        let name = &lines[row].cells[c];
                        if name.is_empty() {
                            Value::Text(format!("Unnamed: {}_level_{}", c, level))
                        } else {
                            Value::Text(name.clone())
                        }
                    })
                    .collect()
            })
            .collect()),
    }
}

/// Make labels unique: a repeated `x` becomes `x.1`, `x.2`, ...
fn dedup(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut n = 0;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{}.{}", name, n);
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

fn parse_column(
    data: &[&Line],
    col: usize,
    label: &[Value],
    options: &ParserOptions,
) -> Result<Vec<Value>> {
    let raw: Vec<(usize, &str)> = data
        .iter()
        .map(|line| (line.number, line.cells[col].as_str()))
        .collect();

    let override_dtype = match label {
        [single] => options.dtype.get(&single.to_string()).copied(),
        _ => None,
    };
    let dtype = override_dtype.unwrap_or_else(|| {
        if options.infer_types {
            infer_dtype(raw.iter().map(|(_, s)| *s).filter(|s| !options.is_na(s)))
        } else {
            DType::Str
        }
    });

    raw.into_iter()
        .map(|(number, s)| {
            if options.is_na(s) {
                Ok(Value::Null)
            } else {
                convert(s, dtype).map_err(|message| SheetframeError::Parse {
                    line: number,
                    message,
                })
            }
        })
        .collect()
}

fn check_index_cols(index_col: &[usize], width: usize) -> Result<()> {
    let mut seen = HashSet::new();
    for &col in index_col {
        if col >= width {
            return Err(SheetframeError::invalid(
                "index_col",
                format!("column {} is out of range ({} columns)", col, width),
            ));
        }
        if !seen.insert(col) {
            return Err(SheetframeError::invalid(
                "index_col",
                format!("column {} listed twice", col),
            ));
        }
    }
    Ok(())
}

/// An index level is named after its column's label (last header level);
/// generated `Unnamed: ...` labels leave it unnamed.
fn index_name(label: &[Value], labeled: bool) -> Option<String> {
    if !labeled {
        return None;
    }
    let name = label.last()?.to_string();
    if name.starts_with("Unnamed: ") {
        None
    } else {
        Some(name)
    }
}
