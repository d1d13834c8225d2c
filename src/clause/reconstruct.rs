//! Rebuilding a WHERE clause from edited conditions
//!
//! The primary path splices the new predicate over the exact span the
//! locator reports, so trailing `GROUP BY`/`ORDER BY`/`LIMIT` survive. When
//! that fails (typically a statement the tokenizer rejects) a regex replacement
//! is tried, and when that fails too the original statement is kept.

use crate::clause::locator::{insertion_point, locate_where};
use crate::condition::{Condition, ConditionValue};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{Result, WhereClauseError};
use crate::value::format_value;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static FALLBACK_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?is)^(.*?\sWHERE\s+)(.*?)",
        r"(\s+(?:GROUP\s+BY|ORDER\s+BY|CONNECT\s+BY|FOR\s+(?:UPDATE|SHARE|NO\s+KEY|KEY)",
        r"|HAVING|WINDOW|LIMIT|OFFSET|FETCH|UNION|EXCEPT|INTERSECT|RETURNING)\b.*|\s*;.*|)$",
    ))
    .unwrap()
});

static TRAILING_WHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*WHERE\s+$").unwrap());

/// Which strategy produced the reconstructed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructPath {
    /// The old predicate was replaced in place
    Spliced,
    /// The statement had no WHERE clause and one was inserted
    Inserted,
    /// The condition list was empty and the WHERE clause was dropped
    Removed,
    /// The regex fallback replaced the predicate
    Fallback,
    /// Nothing changed
    Unchanged,
}

/// Rebuild `original` around `conditions`; never fails
pub fn reconstruct_query(
    original: &str,
    conditions: &[Condition],
    diags: &mut Diagnostics,
) -> (String, ReconstructPath) {
    let clause = match build_where_clause(conditions, diags) {
        Ok(clause) => clause,
        Err(e) => {
            diags.warn(
                DiagnosticKind::ReconstructFailed,
                format!("Cannot render conditions, keeping original query: {}", e),
            );
            return (original.to_string(), ReconstructPath::Unchanged);
        }
    };

    match splice(original, &clause) {
        Ok(result) => result,
        Err(primary) => {
            diags.warn(
                DiagnosticKind::ReconstructFallback,
                format!("Splicing the WHERE clause failed, trying regex fallback: {}", primary),
            );
            match regex_replace(original, &clause) {
                Ok(query) => (query, ReconstructPath::Fallback),
                Err(fallback) => {
                    diags.warn(
                        DiagnosticKind::ReconstructFailed,
                        format!("Regex fallback failed, keeping original query: {}", fallback),
                    );
                    (original.to_string(), ReconstructPath::Unchanged)
                }
            }
        }
    }
}

/// AND-join the rendered conditions
pub fn build_where_clause(conditions: &[Condition], diags: &mut Diagnostics) -> Result<String> {
    let parts = conditions
        .iter()
        .map(|condition| render_condition(condition, diags))
        .collect::<Result<Vec<_>>>()?;

    let clause = parts.join(" AND ");
    tracing::debug!(clause = %clause, "built WHERE clause");
    Ok(clause)
}

/// Render one condition as SQL
pub fn render_condition(condition: &Condition, diags: &mut Diagnostics) -> Result<String> {
    let field = &condition.field;
    let operator = condition.operator;

    if operator.is_null_check() {
        return Ok(format!("{} {}", field, operator));
    }

    if operator.is_range() {
        let parts = condition.value.parts();
        let [lo, hi] = parts.as_slice() else {
            return Err(WhereClauseError::InvalidValue {
                operator: operator.to_string(),
                reason: format!("expected two bounds, got {}", parts.len()),
            });
        };
        if condition.is_function || condition.is_expression {
            return Ok(format!("{} {} {} AND {}", field, operator, lo, hi));
        }
        let lo = format_value(Some(*lo), condition.value_type, diags);
        let hi = format_value(Some(*hi), condition.value_type, diags);
        return Ok(format!("{} {} {} AND {}", field, operator, lo, hi));
    }

    if operator.is_list() {
        if condition.value.is_null() {
            return Err(WhereClauseError::InvalidValue {
                operator: operator.to_string(),
                reason: "missing member list".to_string(),
            });
        }
        let members = condition
            .value
            .parts()
            .into_iter()
            .map(|member| {
                if condition.is_expression {
                    member.to_string()
                } else {
                    format_value(Some(member), condition.value_type, diags)
                }
            })
            .collect::<Vec<_>>();
        return Ok(format!("{} {} ({})", field, operator, members.join(", ")));
    }

    let value = match &condition.value {
        ConditionValue::Null => format_value(None, condition.value_type, diags),
        ConditionValue::Scalar(value) if condition.is_expression => value.clone(),
        ConditionValue::Scalar(value) => {
            format_value(Some(value.as_str()), condition.value_type, diags)
        }
        ConditionValue::Pair(..) | ConditionValue::List(_) => {
            return Err(WhereClauseError::InvalidValue {
                operator: operator.to_string(),
                reason: "expected a single value".to_string(),
            })
        }
    };
    Ok(format!("{} {} {}", field, operator, value))
}

/// Primary path: replace the located predicate span
///
/// An empty `clause` removes the WHERE clause altogether.
fn splice(original: &str, clause: &str) -> Result<(String, ReconstructPath)> {
    let located = match locate_where(original)? {
        Some(located) => located,
        None if clause.is_empty() => {
            return Ok((original.to_string(), ReconstructPath::Unchanged));
        }
        None => {
            let at = insertion_point(original)?;
            let query = format!("{} WHERE {}{}", &original[..at], clause, &original[at..]);
            tracing::debug!(query = %query, "inserted WHERE clause");
            return Ok((query, ReconstructPath::Inserted));
        }
    };

    if clause.is_empty() {
        let before = original[..located.keyword.start].trim_end();
        let query = format!("{}{}", before, &original[located.body.end..]);
        return Ok((query, ReconstructPath::Removed));
    }

    let query = if located.body.is_empty() {
        format!(
            "{} {}{}",
            &original[..located.keyword.end],
            clause,
            &original[located.keyword.end..]
        )
    } else {
        format!(
            "{}{}{}",
            &original[..located.body.start],
            clause,
            &original[located.body.end..]
        )
    };
    tracing::debug!(query = %query, "spliced WHERE clause");
    Ok((query, ReconstructPath::Spliced))
}

/// Fallback path: replace the text between `WHERE` and the next clause keyword
fn regex_replace(original: &str, clause: &str) -> Result<String> {
    let caps = FALLBACK_SPLIT
        .captures(original)
        .ok_or(WhereClauseError::WhereNotFound)?;

    let head = &caps[1];
    let tail = &caps[3];

    if clause.is_empty() {
        return Ok(format!("{}{}", TRAILING_WHERE.replace(head, ""), tail));
    }
    Ok(format!("{}{}{}", head, clause, tail))
}
