//! Scalar literal handling
//!
//! The typer guesses what a bare operand is, the formatter turns a typed
//! operand back into SQL literal syntax. [`unquote`] sits in front of both:
//! the matcher hands them operands with the surrounding quotes removed.

mod formatter;
mod typer;


pub use formatter::*;
pub use typer::*;

/// Strip one layer of SQL quoting from a raw operand
///
/// A properly wrapped `'...'` literal has its doubled quotes collapsed, so
/// `'O''Brien'` becomes `O'Brien`. Anything else just loses stray quote
/// characters at either end. Function-call operands are left as written.
pub fn unquote(raw: &str) -> String {
    let raw = raw.trim();
    if raw.to_ascii_lowercase().contains("to_date(") {
        return raw.to_string();
    }
    for quote in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            let inner = &raw[1..raw.len() - 1];
            let doubled = format!("{}{}", quote, quote);
            return inner.replace(&doubled, &quote.to_string());
        }
    }
    raw.trim_matches(|c| c == '\'' || c == '"').to_string()
}

/// An operand written without string quotes that is not a number
///
/// Bind parameters, column references, keywords like `SYSDATE` or `NULL`
/// and function calls all qualify. Such operands are SQL, not data.
pub fn is_bare_expression(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && !raw.starts_with('\'') && !is_number(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_single_quoted() {
        assert_eq!(unquote("'abc'"), "abc");
        assert_eq!(unquote("  'a b'  "), "a b");
        assert_eq!(unquote("'O''Brien'"), "O'Brien");
        assert_eq!(unquote("''"), "");
    }

    #[test]
    fn test_unquote_double_quoted() {
        assert_eq!(unquote("\"abc\""), "abc");
        assert_eq!(unquote("\"it's\""), "it's");
    }

    #[test]
    fn test_unquote_bare_and_unbalanced() {
        assert_eq!(unquote("42"), "42");
        assert_eq!(unquote("'abc"), "abc");
        assert_eq!(unquote("abc'"), "abc");
        assert_eq!(unquote("'"), "");
        assert_eq!(unquote(":param"), ":param");
    }

    #[test]
    fn test_bare_expressions() {
        for raw in [":id", "SYSDATE", "a.y", "NULL", "\"Col\"", "to_date(:d, 'YYYY')"] {
            assert!(is_bare_expression(raw), "raw: {:?}", raw);
        }
        for raw in ["'x'", " 'it''s' ", "42", "-1.5", "", "'open"] {
            assert!(!is_bare_expression(raw), "raw: {:?}", raw);
        }
    }

    #[test]
    fn test_unquote_keeps_function_calls() {
        assert_eq!(unquote(" to_date(:d, 'YYYY') "), "to_date(:d, 'YYYY')");
        assert_eq!(unquote("'to_date('"), "'to_date('");
    }
}
