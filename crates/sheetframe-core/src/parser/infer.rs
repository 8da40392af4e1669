//! Column type inference and conversion.

use chrono::{NaiveDate, NaiveDateTime};
use sheetframe_engine::engine::{DATETIME_FORMAT, Value};

use super::DType;

/// Pick a type for a column from its non-null raw values.
///
/// - every value an integer -> Int (also for an all-null column)
/// - every value a number -> Float
/// - every value `true`/`false` in any case -> Bool
/// - otherwise -> Str
pub(crate) fn infer_dtype<'a>(values: impl Iterator<Item = &'a str> + Clone) -> DType {
    if values.clone().all(looks_int) {
        DType::Int
    } else if values.clone().all(looks_float) {
        DType::Float
    } else if values.clone().all(|v| parse_bool(v).is_some()) {
        DType::Bool
    } else {
        DType::Str
    }
}

/// Convert one non-null raw value. Returns an error message on failure.
pub(crate) fn convert(raw: &str, dtype: DType) -> Result<Value, String> {
    match dtype {
        DType::Str => Ok(Value::Text(raw.to_string())),
        DType::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("cannot convert '{}' to int", raw)),
        DType::Float => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("cannot convert '{}' to float", raw)),
        DType::Bool => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| format!("cannot convert '{}' to bool", raw)),
        DType::DateTime => parse_datetime(raw.trim())
            .map(Value::DateTime)
            .ok_or_else(|| format!("cannot convert '{}' to datetime", raw)),
    }
}

/// Strings with leading zeros ("007", "-00.5") are identifiers, not numbers.
fn has_leading_zero(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    digits.starts_with('0')
        && digits.len() > 1
        && digits.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
}

fn plain_numeric(s: &str) -> bool {
    !s.is_empty() && s == s.trim() && !has_leading_zero(s) && s.bytes().any(|b| b.is_ascii_digit())
}

fn looks_int(s: &str) -> bool {
    plain_numeric(s) && s.parse::<i64>().is_ok()
}

fn looks_float(s: &str) -> bool {
    plain_numeric(s) && s.parse::<f64>().is_ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(values: &[&str]) -> DType {
        infer_dtype(values.iter().copied())
    }

    #[test]
    fn test_infer_numeric_columns() {
        assert_eq!(infer(&["1", "-2", "30"]), DType::Int);
        assert_eq!(infer(&["1", "2.5", "1e3"]), DType::Float);
        assert_eq!(infer(&[]), DType::Int);
    }

    #[test]
    fn test_leading_zero_keeps_text() {
        assert_eq!(infer(&["007", "12"]), DType::Str);
        assert_eq!(infer(&["0", "0.5"]), DType::Float);
        assert_eq!(infer(&["-00.5"]), DType::Str);
    }

    #[test]
    fn test_surrounding_whitespace_keeps_text() {
        assert_eq!(infer(&[" 12"]), DType::Str);
    }

    #[test]
    fn test_words_are_not_floats() {
        assert_eq!(infer(&["inf"]), DType::Str);
        assert_eq!(infer(&["infinity", "1"]), DType::Str);
    }

    #[test]
    fn test_infer_bool() {
        assert_eq!(infer(&["TRUE", "false", "True"]), DType::Bool);
        assert_eq!(infer(&["TRUE", "maybe"]), DType::Str);
    }

    #[test]
    fn test_convert_explicit_types() {
        assert_eq!(convert("007", DType::Int), Ok(Value::Int(7)));
        assert_eq!(convert("007", DType::Str), Ok(Value::from("007")));
        assert!(convert("abc", DType::Float).is_err());

        let dt = convert("2024-01-02", DType::DateTime).unwrap();
        assert_eq!(dt.to_string(), "2024-01-02 00:00:00");
        let dt = convert("2024-01-02 03:04:05", DType::DateTime).unwrap();
        assert_eq!(dt.to_string(), "2024-01-02 03:04:05");
    }
}
