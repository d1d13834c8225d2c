//! Rendering typed operands back into SQL literal syntax

use crate::condition::ValueType;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::value::typer::is_number;

/// Render one operand for a reconstructed clause
///
/// Function-call operands such as `to_date(:d, 'YYYY-MM-DD')` pass through
/// untouched. A value tagged `number` that does not parse is quoted as text
/// and reported, never rejected.
pub fn format_value(value: Option<&str>, value_type: ValueType, diags: &mut Diagnostics) -> String {
    let value = match value {
        Some(v) => v,
        None => return "NULL".to_string(),
    };

    if is_function_call(value) {
        return value.to_string();
    }

    match value_type {
        ValueType::Number => {
            if value.trim().is_empty() {
                return "NULL".to_string();
            }
            if is_number(value) {
                value.trim().to_string()
            } else {
                diags.warn(
                    DiagnosticKind::NumberFallback,
                    format!("Value '{}' is not a valid number, quoting as text", value),
                );
                quote_text(value)
            }
        }
        ValueType::Date => {
            if value.trim().is_empty() {
                "NULL".to_string()
            } else if value.contains('\'') {
                value.to_string()
            } else {
                format!("'{}'", value)
            }
        }
        ValueType::Text | ValueType::Null => quote_text(value),
    }
}

/// Single-quote a string, doubling embedded quotes
pub fn quote_text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn is_function_call(value: &str) -> bool {
    value.to_ascii_lowercase().contains("to_date(")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: Option<&str>, value_type: ValueType) -> String {
        format_value(value, value_type, &mut Diagnostics::new())
    }

    #[test]
    fn test_null_regardless_of_type() {
        for t in [ValueType::Number, ValueType::Date, ValueType::Text, ValueType::Null] {
            assert_eq!(fmt(None, t), "NULL");
        }
    }

    #[test]
    fn test_function_call_passthrough() {
        let v = "to_date(:inicio, 'YYYY-MM-DD')";
        assert_eq!(fmt(Some(v), ValueType::Date), v);
        assert_eq!(fmt(Some("TO_DATE(:x,'DD/MM')"), ValueType::Text), "TO_DATE(:x,'DD/MM')");
    }

    #[test]
    fn test_number() {
        assert_eq!(fmt(Some("42"), ValueType::Number), "42");
        assert_eq!(fmt(Some(" 3.5 "), ValueType::Number), "3.5");
        assert_eq!(fmt(Some(""), ValueType::Number), "NULL");
    }

    #[test]
    fn test_number_fallback_warns() {
        let mut diags = Diagnostics::new();
        assert_eq!(format_value(Some("abc"), ValueType::Number, &mut diags), "'abc'");
        assert!(diags.contains(DiagnosticKind::NumberFallback));

        let mut diags = Diagnostics::new();
        assert_eq!(format_value(Some("d'oh"), ValueType::Number, &mut diags), "'d''oh'");
    }

    #[test]
    fn test_date() {
        assert_eq!(fmt(Some("2024-01-31"), ValueType::Date), "'2024-01-31'");
        assert_eq!(fmt(Some("'2024-01-31'"), ValueType::Date), "'2024-01-31'");
        assert_eq!(fmt(Some(""), ValueType::Date), "NULL");
    }

    #[test]
    fn test_text_escapes_quotes() {
        assert_eq!(fmt(Some("O'Brien"), ValueType::Text), "'O''Brien'");
        assert_eq!(fmt(Some(""), ValueType::Text), "''");
        assert_eq!(fmt(Some("50%"), ValueType::Text), "'50%'");
    }
}
