//! Turning one predicate fragment into a structured condition
//!
//! Patterns are tried in a fixed order and the first match wins:
//! `to_date` range, `BETWEEN`, `IN`, `IS NULL`, then binary comparisons.

use crate::condition::ast::{Condition, ConditionValue, Operator, ValueType};
use crate::config::ParserConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{Result, WhereClauseError};
use crate::value::{infer_type_with, is_bare_expression, unquote};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(\S+)\s+(NOT\s+)?BETWEEN",
        r"\s+to_date\s*\(\s*([^,)]+?)\s*,\s*'([^']+)'\s*\)",
        r"\s+AND\s+to_date\s*\(\s*([^,)]+?)\s*,\s*'([^']+)'\s*\)",
    ))
    .unwrap()
});

static BETWEEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^(\S+)\s+(NOT\s+)?BETWEEN\s+(.*?)\s+AND\s+(.*)$").unwrap());

static IN_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^(\S+)\s+(NOT\s+)?IN\s*\((.*)\)").unwrap());

static NULL_CHECK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\S+)\s+IS\s+(NOT\s+)?NULL\b").unwrap());

static COMPARISON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([^\s=<>!]+)\s*(>=|<=|<>|!=|=|>|<)\s*(.*)$").unwrap());

static LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^(\S+)\s+(NOT\s+)?LIKE\s+(.*)$").unwrap());

/// A `to_date` BETWEEN range as written in the clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeMatch {
    pub field: String,
    pub negated: bool,
    pub start_param: String,
    pub start_format: String,
    pub end_param: String,
    pub end_format: String,
}

impl DateRangeMatch {
    fn from_captures(caps: &regex::Captures<'_>) -> Self {
        let group = |i: usize| {
            caps.get(i)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default()
        };
        Self {
            field: group(1),
            negated: caps.get(2).is_some(),
            start_param: group(3),
            start_format: group(4),
            end_param: group(5),
            end_format: group(6),
        }
    }

    /// Build the condition; only the start format is kept as `format`
    pub fn into_condition(self, config: &ParserConfig, diags: &mut Diagnostics) -> Condition {
        if self.start_format != self.end_format {
            diags.warn(
                DiagnosticKind::FormatMismatch,
                format!(
                    "to_date formats differ on {}: '{}' vs '{}', keeping '{}'",
                    self.field, self.start_format, self.end_format, self.start_format
                ),
            );
        }

        let start = render_to_date(&self.start_param, &self.start_format);
        let end = render_to_date(&self.end_param, &self.end_format);

        let mut condition = Condition::new(
            self.field,
            Operator::between(self.negated),
            ConditionValue::Pair(start, end),
            ValueType::Date,
        )
        .with_locale(config.label_locale);
        condition.original_value = Some(vec![self.start_param, self.end_param]);
        condition.is_function = true;
        condition.function_name = Some("to_date".to_string());
        condition.format = Some(self.start_format);
        condition
    }
}

fn render_to_date(param: &str, format: &str) -> String {
    format!("to_date({}, '{}')", param, format)
}

/// First `to_date` range anywhere in `text`, with its byte span
pub fn find_date_range(text: &str) -> Option<(DateRangeMatch, Range<usize>)> {
    let caps = DATE_RANGE.captures(text)?;
    let whole = caps.get(0)?;
    Some((DateRangeMatch::from_captures(&caps), whole.range()))
}

/// Match one predicate fragment
///
/// The returned condition has id 0; the caller numbers the list.
pub fn match_condition(
    fragment: &str,
    config: &ParserConfig,
    diags: &mut Diagnostics,
) -> Result<Condition> {
    let text = trim_parens(fragment);
    let type_of = |value: &str| infer_type_with(Some(value), config.date_formats.as_slice());

    if let Some((range, span)) = find_date_range(text) {
        if span.start == 0 {
            return Ok(range.into_condition(config, diags));
        }
    }

    let condition = if let Some(caps) = BETWEEN.captures(text) {
        let operands = Operands::read(&[&caps[3], &caps[4]]);
        let value_type = operands.value_type(type_of);
        let [lo, hi]: [String; 2] = operands
            .values
            .try_into()
            .map_err(|_| WhereClauseError::UnparseableCondition(fragment.to_string()))?;
        let mut condition = Condition::new(
            &caps[1],
            Operator::between(caps.get(2).is_some()),
            ConditionValue::Pair(lo, hi),
            value_type,
        );
        condition.is_expression = operands.is_expression;
        condition
    } else if let Some(caps) = IN_LIST.captures(text) {
        let members = split_list(&caps[3]);
        let members = members.iter().map(String::as_str).collect::<Vec<_>>();
        let operands = Operands::read(&members);
        let value_type = operands.value_type(type_of);
        let mut condition = Condition::new(
            &caps[1],
            Operator::in_list(caps.get(2).is_some()),
            ConditionValue::List(operands.values),
            value_type,
        );
        condition.is_expression = operands.is_expression;
        condition
    } else if let Some(caps) = NULL_CHECK.captures(text) {
        Condition::new(
            &caps[1],
            Operator::null_check(caps.get(2).is_some()),
            ConditionValue::Null,
            ValueType::Null,
        )
    } else if let Some(caps) = LIKE.captures(text) {
        let operator = if caps.get(2).is_some() {
            Operator::NotLike
        } else {
            Operator::Like
        };
        scalar_condition(&caps[1], operator, &caps[3], type_of)
    } else if let Some(caps) = COMPARISON.captures(text) {
        let operator: Operator = caps[2].parse()?;
        scalar_condition(&caps[1], operator, &caps[3], type_of)
    } else {
        return Err(WhereClauseError::UnparseableCondition(fragment.to_string()));
    };

    Ok(condition.with_locale(config.label_locale))
}

fn scalar_condition(
    field: &str,
    operator: Operator,
    raw: &str,
    type_of: impl Fn(&str) -> ValueType,
) -> Condition {
    let operands = Operands::read(&[raw]);
    let value_type = operands.value_type(type_of);
    let value = operands.values.into_iter().next().unwrap_or_default();
    let mut condition = Condition::new(field, operator, ConditionValue::Scalar(value), value_type);
    condition.is_expression = operands.is_expression;
    condition
}

/// Right-hand operands of one predicate
///
/// When any operand is a bare SQL expression all of them are kept exactly as
/// written, so mixed lists like `(:p, 'x')` render back unchanged. Otherwise
/// each operand is unquoted.
struct Operands {
    values: Vec<String>,
    /// First operand without quotes, for typing
    first: Option<String>,
    is_expression: bool,
}

impl Operands {
    fn read(raw: &[&str]) -> Self {
        let is_expression = raw.iter().any(|r| is_bare_expression(r));
        let values = if is_expression {
            raw.iter().map(|r| r.trim().to_string()).collect()
        } else {
            raw.iter().map(|r| unquote(r)).collect()
        };
        Self {
            values,
            first: raw.first().map(|r| unquote(r)),
            is_expression,
        }
    }

    fn value_type(&self, type_of: impl Fn(&str) -> ValueType) -> ValueType {
        self.first
            .as_deref()
            .map(type_of)
            .unwrap_or(ValueType::Text)
    }
}

/// Split an `IN` list on top-level commas outside quotes, members trimmed
fn split_list(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut depth = 0i32;

    for c in inner.chars() {
        match c {
            '\'' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => depth -= 1,
            ',' if !in_quote && depth == 0 => {
                items.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    items.push(current.trim().to_string());

    items
}

/// Drop wrapping parentheses and stray ones left over from OR flattening
fn trim_parens(fragment: &str) -> &str {
    let mut text = fragment.trim();

    while text.starts_with('(') && closing_paren(text) == Some(text.len() - 1) {
        text = text[1..text.len() - 1].trim();
    }

    let mut balance = paren_balance(text);
    while balance > 0 && text.starts_with('(') {
        text = text[1..].trim_start();
        balance -= 1;
    }
    while balance < 0 && text.ends_with(')') {
        text = text[..text.len() - 1].trim_end();
        balance += 1;
    }

    text
}

/// Byte index of the parenthesis closing the one at index 0
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_quote = false;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Opening minus closing parentheses outside quotes
fn paren_balance(text: &str) -> i32 {
    let mut balance = 0;
    let mut in_quote = false;
    for c in text.chars() {
        match c {
            '\'' => in_quote = !in_quote,
            '(' if !in_quote => balance += 1,
            ')' if !in_quote => balance -= 1,
            _ => {}
        }
    }
    balance
}
