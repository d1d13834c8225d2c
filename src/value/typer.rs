//! Value type inference

use crate::condition::ValueType;
use crate::config::DEFAULT_DATE_FORMATS;
use chrono::{NaiveDate, NaiveDateTime};

/// Classify a bare operand using the default date layouts
pub fn infer_type(value: Option<&str>) -> ValueType {
    infer_type_with(value, &DEFAULT_DATE_FORMATS)
}

/// Classify a bare operand: null, then number, then date, otherwise text
///
/// This is a heuristic, so `20240101` is a number, not a date.
pub fn infer_type_with<S: AsRef<str>>(value: Option<&str>, date_formats: &[S]) -> ValueType {
    let value = match value {
        Some(v) => v,
        None => return ValueType::Null,
    };

    if is_number(value) {
        return ValueType::Number;
    }

    if matches_date_format(value, date_formats).is_some() {
        return ValueType::Date;
    }

    ValueType::Text
}

/// Finite floating-point literal, surrounding whitespace allowed
pub fn is_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|f| f.is_finite())
        .unwrap_or(false)
}

/// First format in `date_formats` that parses `value` completely
pub fn matches_date_format<'f, S: AsRef<str>>(
    value: &str,
    date_formats: &'f [S],
) -> Option<&'f str> {
    date_formats.iter().map(AsRef::as_ref).find(|format| {
        NaiveDate::parse_from_str(value, format).is_ok()
            || NaiveDateTime::parse_from_str(value, format).is_ok()
    })
}
