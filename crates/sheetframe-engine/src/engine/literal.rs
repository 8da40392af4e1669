//! Table value -> cell literal.

use serde::Serialize;

use super::escaping::StringEscaping;
use super::value::Value;

/// The value actually submitted for a cell: a native number, or text that
/// may carry a leading `'` to force literal interpretation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellLiteral {
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellLiteral {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellLiteral::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellLiteral {
    fn from(s: &str) -> Self {
        CellLiteral::Text(s.to_string())
    }
}

/// Convert a table value into the literal submitted for its cell.
///
/// Order matters:
/// 1. null -> empty string
/// 2. integers and floats pass through as numbers
/// 3. anything else is rendered with the table display convention
/// 4. if formulas are not allowed, text starting with `=` gets a `'` prefix
///    and no further escaping
/// 5. otherwise `escaping` decides whether to prefix with `'`
pub fn serialize_cell(value: &Value, allow_formulas: bool, escaping: &StringEscaping) -> CellLiteral {
    if value.is_null() {
        return CellLiteral::Text(String::new());
    }
    match value {
        Value::Int(n) => return CellLiteral::Int(*n),
        Value::Float(n) => return CellLiteral::Float(*n),
        _ => {}
    }

    let text = match value {
        Value::Text(s) => s.clone(),
        other => other.to_string(),
    };

    if !allow_formulas && text.starts_with('=') {
        return CellLiteral::Text(format!("'{}", text));
    }
    CellLiteral::Text(escaping.apply(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> CellLiteral {
        CellLiteral::Text(s.to_string())
    }

    #[test]
    fn test_null_maps_to_empty_regardless_of_flags() {
        for allow in [true, false] {
            for policy in [StringEscaping::Default, StringEscaping::Off, StringEscaping::Full] {
                assert_eq!(serialize_cell(&Value::Null, allow, &policy), text(""));
                assert_eq!(serialize_cell(&Value::Float(f64::NAN), allow, &policy), text(""));
            }
        }
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(
            serialize_cell(&Value::Int(7), false, &StringEscaping::Full),
            CellLiteral::Int(7)
        );
        assert_eq!(
            serialize_cell(&Value::Float(-1.5), true, &StringEscaping::Full),
            CellLiteral::Float(-1.5)
        );
    }

    #[test]
    fn test_booleans_are_text() {
        assert_eq!(
            serialize_cell(&Value::Bool(true), true, &StringEscaping::Default),
            text("TRUE")
        );
        assert_eq!(
            serialize_cell(&Value::Bool(false), true, &StringEscaping::Full),
            text("'FALSE")
        );
    }

    #[test]
    fn test_formula_escaping_ignores_string_escaping() {
        let v = Value::from("=SUM(A1:A2)");
        assert_eq!(serialize_cell(&v, false, &StringEscaping::Off), text("'=SUM(A1:A2)"));
        assert_eq!(serialize_cell(&v, false, &StringEscaping::Full), text("'=SUM(A1:A2)"));
        assert_eq!(serialize_cell(&v, true, &StringEscaping::Off), text("=SUM(A1:A2)"));
    }

    #[test]
    fn test_escaping_modes() {
        let v = Value::from("'hello");
        assert_eq!(serialize_cell(&v, true, &StringEscaping::Default), text("''hello"));
        assert_eq!(serialize_cell(&v, true, &StringEscaping::Off), text("'hello"));
        assert_eq!(serialize_cell(&v, true, &StringEscaping::Full), text("''hello"));
    }

    #[test]
    fn test_predicate_sees_display_string() {
        let policy = StringEscaping::predicate(|s| s.len() > 3);
        assert_eq!(serialize_cell(&Value::from("abcd"), true, &policy), text("'abcd"));
        assert_eq!(serialize_cell(&Value::from("abc"), true, &policy), text("abc"));
    }

    #[test]
    fn test_literal_serializes_untagged() {
        let row = vec![CellLiteral::Int(1), CellLiteral::Float(0.5), text("x")];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[1,0.5,"x"]"#);
    }

    fn any_policy() -> impl Strategy<Value = StringEscaping> {
        prop_oneof![
            Just(StringEscaping::Default),
            Just(StringEscaping::Off),
            Just(StringEscaping::Full),
            Just(StringEscaping::predicate(|s| s.len() % 2 == 0)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            failure_persistence: None,
            .. ProptestConfig::default()
        })]

        #[test]
        fn formula_text_is_quoted_once_under_every_policy(body in ".{0,16}", policy in any_policy()) {
            let formula = format!("={}", body);
            let literal = serialize_cell(&Value::Text(formula.clone()), false, &policy);
            prop_assert_eq!(literal, CellLiteral::Text(format!("'{}", formula)));
        }

        #[test]
        fn off_policy_passes_text_through(body in ".{0,16}") {
            let literal = serialize_cell(&Value::Text(body.clone()), true, &StringEscaping::Off);
            prop_assert_eq!(literal, CellLiteral::Text(body));
        }
    }
}
