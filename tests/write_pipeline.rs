//! Write pipeline behaviour against an in-memory worksheet.

use pretty_assertions::assert_eq;
use regex::Regex;
use sheetframe::{
    CellRef, CellValue, MemoryWorksheet, SheetCall, SheetframeError, StringEscaping, Table,
    Value, ValueInputOption, Worksheet, WriteOptions, resize_to_minimum, write_table,
    write_tables,
};

fn small() -> Table {
    Table::from_rows(&["a", "b"], vec![vec![1.into(), 2.into()]]).unwrap()
}

fn resizes(sheet: &MemoryWorksheet) -> Vec<SheetCall> {
    sheet
        .calls()
        .into_iter()
        .filter(|c| matches!(c, SheetCall::Resize { .. }))
        .collect()
}

fn updates(sheet: &MemoryWorksheet) -> usize {
    sheet
        .calls()
        .iter()
        .filter(|c| matches!(c, SheetCall::UpdateCells(_)))
        .count()
}

#[test]
fn test_empty_table_issues_no_call() {
    let mut sheet = MemoryWorksheet::new("S", 1, 1);
    write_table(&mut sheet, &Table::default(), &WriteOptions::default()).unwrap();
    assert!(sheet.calls().is_empty());
}

#[test]
fn test_small_table_does_not_resize() {
    let mut sheet = MemoryWorksheet::new("S", 100, 26);
    write_table(&mut sheet, &small(), &WriteOptions::default()).unwrap();
    assert!(resizes(&sheet).is_empty());
    assert_eq!(updates(&sheet), 1);
    assert_eq!((sheet.row_count(), sheet.col_count()), (100, 26));
}

#[test]
fn test_large_table_grows_only_the_short_dimension() {
    let mut sheet = MemoryWorksheet::new("S", 1, 26);
    write_table(&mut sheet, &small(), &WriteOptions::default()).unwrap();
    assert_eq!(
        resizes(&sheet),
        vec![SheetCall::Resize {
            rows: Some(2),
            cols: None
        }]
    );
    assert_eq!((sheet.row_count(), sheet.col_count()), (2, 26));
    assert_eq!(sheet.value(CellRef::new(1, 1)), Some(CellValue::Number(2.0)));
}

#[test]
fn test_resize_true_fits_exactly() {
    let mut sheet = MemoryWorksheet::new("S", 100, 26);
    let options = WriteOptions::default().at(3, 2).with_resize(true);
    write_table(&mut sheet, &small(), &options).unwrap();
    assert_eq!(
        resizes(&sheet),
        vec![SheetCall::Resize {
            rows: Some(4),
            cols: Some(3)
        }]
    );
    assert_eq!((sheet.row_count(), sheet.col_count()), (4, 3));
}

#[test]
fn test_resize_to_minimum_never_shrinks() {
    let mut sheet = MemoryWorksheet::new("S", 10, 10);
    resize_to_minimum(&mut sheet, Some(5), Some(5)).unwrap();
    assert!(sheet.calls().is_empty());
    resize_to_minimum(&mut sheet, Some(5), Some(12)).unwrap();
    assert_eq!((sheet.row_count(), sheet.col_count()), (10, 12));
}

#[test]
fn test_batch_is_user_entered() {
    let mut sheet = MemoryWorksheet::new("S", 10, 10);
    write_table(&mut sheet, &small(), &WriteOptions::default()).unwrap();
    let Some(SheetCall::UpdateCells(request)) = sheet.calls().pop() else {
        panic!("expected an update call");
    };
    assert_eq!(request.value_input_option, ValueInputOption::UserEntered);
    assert_eq!(request.cell_count(), 4);
}

#[test]
fn test_write_tables_uses_one_submission() {
    let mut sheet = MemoryWorksheet::new("S", 2, 2);
    let second = Table::from_rows(&["c"], vec![vec!["x".into()], vec!["y".into()]]).unwrap();

    write_tables(&mut sheet, &[small(), second], &[1, 5], &WriteOptions::default()).unwrap();

    assert_eq!(updates(&sheet), 1);
    assert_eq!(
        resizes(&sheet),
        vec![SheetCall::Resize {
            rows: Some(7),
            cols: None
        }]
    );
    assert_eq!(sheet.value(CellRef::new(0, 1)), Some(CellValue::from("b")));
    assert_eq!(sheet.value(CellRef::new(4, 0)), Some(CellValue::from("c")));
    assert_eq!(sheet.value(CellRef::new(6, 0)), Some(CellValue::from("y")));
    assert_eq!(sheet.value(CellRef::new(2, 0)), None);
}

#[test]
fn test_write_tables_honours_header_flag() {
    let mut sheet = MemoryWorksheet::new("S", 10, 10);
    let options = WriteOptions::default().at(1, 3).with_column_header(false);
    write_tables(&mut sheet, &[small(), small()], &[1, 2], &options).unwrap();
    assert_eq!(sheet.value(CellRef::new(0, 2)), Some(CellValue::Number(1.0)));
    assert_eq!(sheet.value(CellRef::new(1, 3)), Some(CellValue::Number(2.0)));
    assert_eq!(sheet.value(CellRef::new(2, 2)), None);
}

#[test]
fn test_write_tables_requires_one_row_per_table() {
    let mut sheet = MemoryWorksheet::new("S", 10, 10);
    let err = write_tables(&mut sheet, &[small()], &[1, 4], &WriteOptions::default()).unwrap_err();
    assert!(matches!(err, SheetframeError::InvalidOption { option: "rows", .. }));
    assert!(sheet.calls().is_empty());
}

#[test]
fn test_zero_anchor_is_rejected() {
    let mut sheet = MemoryWorksheet::new("S", 10, 10);
    let err = write_table(&mut sheet, &small(), &WriteOptions::default().at(0, 1)).unwrap_err();
    assert!(matches!(err, SheetframeError::InvalidOption { option: "row", .. }));
}

#[test]
fn test_predicate_escaping_from_regex() {
    let table = Table::from_rows(&["code"], vec![vec!["0042".into()], vec!["abc".into()]]).unwrap();
    let mut sheet = MemoryWorksheet::new("S", 3, 1);
    let options = WriteOptions::default()
        .with_string_escaping(StringEscaping::matching(Regex::new(r"^\d+$").unwrap()));
    write_table(&mut sheet, &table, &options).unwrap();
    assert_eq!(sheet.value(CellRef::new(1, 0)), Some(CellValue::from("0042")));
    assert_eq!(sheet.value(CellRef::new(2, 0)), Some(CellValue::from("abc")));
}

#[test]
fn test_transport_failure_propagates_unchanged() {
    let mut sheet = MemoryWorksheet::new("S", 10, 10);
    sheet.set_unavailable("rate limited");
    let err = write_table(&mut sheet, &small(), &WriteOptions::default()).unwrap_err();
    let SheetframeError::Transport(source) = err else {
        panic!("expected a transport error");
    };
    let memory = source.downcast_ref::<sheetframe::MemoryError>().unwrap();
    assert_eq!(memory, &sheetframe::MemoryError::Unavailable("rate limited".to_string()));
}

#[test]
fn test_nulls_clear_previous_content() {
    let mut sheet = MemoryWorksheet::new("S", 2, 1).with_rows(&[&["old"], &["stale"]]);
    let table = Table::from_rows(&["new"], vec![vec![Value::Null]]).unwrap();
    write_table(&mut sheet, &table, &WriteOptions::default()).unwrap();
    assert_eq!(sheet.value(CellRef::new(0, 0)), Some(CellValue::from("new")));
    assert_eq!(sheet.value(CellRef::new(1, 0)), None);
}

fn escaping_policy(name: &str) -> sheetframe::Result<StringEscaping> {
    Ok(name.parse::<StringEscaping>()?)
}

#[test]
fn test_unknown_escaping_policy_is_a_configuration_error() {
    assert!(matches!(escaping_policy("full"), Ok(StringEscaping::Full)));
    let err = escaping_policy("sometimes").unwrap_err();
    assert!(matches!(err, SheetframeError::Configuration(_)));
}

#[test]
fn test_unknown_escaping_policy_from_toml_is_a_configuration_error() {
    let err = WriteOptions::from_toml_str("string_escaping = \"sometimes\"").unwrap_err();
    assert!(matches!(
        err,
        SheetframeError::Configuration(sheetframe::EscapingError::UnknownPolicy(_))
    ));
}
