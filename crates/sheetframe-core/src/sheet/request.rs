//! Request and response payloads for the values API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sheetframe_engine::engine::{Cell, CellLiteral, CellRef, CellValue};

/// How values are rendered in a read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueRenderOption {
    FormattedValue,
    UnformattedValue,
    Formula,
}

/// How dates and times are rendered in a read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateTimeRenderOption {
    SerialNumber,
    FormattedString,
}

/// How submitted values are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    /// Stored exactly as sent.
    Raw,
    /// Parsed as if typed into the UI (numbers, dates, formulas, `'` escapes).
    UserEntered,
}

/// A values read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesRequest {
    pub range: String,
    pub value_render_option: ValueRenderOption,
    pub date_time_render_option: DateTimeRenderOption,
}

impl ValuesRequest {
    /// Read a whole worksheet, either computed values or raw formula text.
    pub fn for_sheet(title: &str, evaluate_formulas: bool) -> Self {
        ValuesRequest {
            range: title.to_string(),
            value_render_option: if evaluate_formulas {
                ValueRenderOption::UnformattedValue
            } else {
                ValueRenderOption::Formula
            },
            date_time_render_option: DateTimeRenderOption::FormattedString,
        }
    }
}

/// A values read response. `values` is ragged and may be absent for an
/// empty range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<CellValue>>,
}

/// Summary returned by a batch write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateResponse {
    pub spreadsheet_id: Option<String>,
    pub total_updated_rows: usize,
    pub total_updated_columns: usize,
    pub total_updated_cells: usize,
}

/// One contiguous run of cells in a batch write.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RangeUpdate {
    pub range: String,
    pub values: Vec<Vec<CellLiteral>>,
}

/// The body of a batch values write.
///
/// Cells are grouped into horizontal runs so cells that were not planned are
/// never overwritten.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub value_input_option: ValueInputOption,
    pub data: Vec<RangeUpdate>,
}

impl BatchUpdateRequest {
    /// Group `cells` into row runs, ordered by position. A later write to the
    /// same position replaces an earlier one; cells at row or column 0 are
    /// skipped.
    pub fn from_cells(title: &str, cells: &[Cell], input: ValueInputOption) -> Self {
        let positioned: BTreeMap<CellRef, &CellLiteral> = cells
            .iter()
            .filter_map(|c| Some((c.cell_ref()?, &c.value)))
            .collect();

        let mut data = Vec::new();
        let mut run: Vec<(CellRef, &CellLiteral)> = Vec::new();
        for entry in positioned {
            let continues = run
                .last()
                .is_some_and(|(prev, _)| prev.row == entry.0.row && prev.col + 1 == entry.0.col);
            if !continues && !run.is_empty() {
                data.push(range_update(title, &run));
                run.clear();
            }
            run.push(entry);
        }
        if !run.is_empty() {
            data.push(range_update(title, &run));
        }

        BatchUpdateRequest {
            value_input_option: input,
            data,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.data.iter().map(|r| r.values.iter().map(Vec::len).sum::<usize>()).sum()
    }
}

fn range_update(title: &str, run: &[(CellRef, &CellLiteral)]) -> RangeUpdate {
    let start = run[0].0;
    let end = run[run.len() - 1].0;
    RangeUpdate {
        range: CellRef::range_label(title, start, end),
        values: vec![run.iter().map(|(_, v)| (*v).clone()).collect()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_request_params() {
        let request = ValuesRequest::for_sheet("Data", false);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "range": "Data",
                "valueRenderOption": "FORMULA",
                "dateTimeRenderOption": "FORMATTED_STRING",
            })
        );
        let evaluated = ValuesRequest::for_sheet("Data", true);
        assert_eq!(evaluated.value_render_option, ValueRenderOption::UnformattedValue);
    }

    #[test]
    fn test_value_range_without_values() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range": "Data!A1:Z1000", "majorDimension": "ROWS"}"#).unwrap();
        assert!(range.values.is_empty());
        assert_eq!(range.major_dimension.as_deref(), Some("ROWS"));
    }

    #[test]
    fn test_batch_groups_contiguous_runs() {
        let cells = vec![
            Cell::new(1, 2, CellLiteral::from("b")),
            Cell::new(1, 1, CellLiteral::from("a")),
            Cell::new(1, 4, CellLiteral::Int(4)),
            Cell::new(2, 1, CellLiteral::Float(0.5)),
            Cell::new(0, 1, CellLiteral::from("dropped")),
        ];
        let request = BatchUpdateRequest::from_cells("S", &cells, ValueInputOption::UserEntered);
        let ranges: Vec<&str> = request.data.iter().map(|r| r.range.as_str()).collect();
        assert_eq!(ranges, vec!["'S'!A1:B1", "'S'!D1", "'S'!A2"]);
        assert_eq!(request.cell_count(), 4);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["valueInputOption"], "USER_ENTERED");
        assert_eq!(body["data"][0]["values"], serde_json::json!([["a", "b"]]));
    }

    #[test]
    fn test_batch_last_write_wins() {
        let cells = vec![
            Cell::new(1, 1, CellLiteral::from("first")),
            Cell::new(1, 1, CellLiteral::from("second")),
        ];
        let request = BatchUpdateRequest::from_cells("S", &cells, ValueInputOption::Raw);
        assert_eq!(request.data.len(), 1);
        assert_eq!(request.data[0].values, vec![vec![CellLiteral::from("second")]]);
    }
}
