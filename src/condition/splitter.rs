//! Dividing a WHERE clause into predicate fragments
//!
//! The result is flat: `(a OR b) AND c` becomes three fragments, matching
//! the flat condition list the editor works with.

use crate::clause::locator::is_keyword;
use crate::clause::tokens::tokenize;
use crate::condition::matcher::{find_date_range, DateRangeMatch};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::keywords::Keyword;

static LEADING_CONNECTOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:AND|OR)\s+").unwrap());

static AND_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\sAND\s").unwrap());

static OR_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\sOR\s").unwrap());

/// One unit of a split clause
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// `field [NOT] BETWEEN to_date(..) AND to_date(..)`, already structured
    DateRange(DateRangeMatch),
    /// Raw predicate text for the matcher
    Predicate(String),
}

/// Split a WHERE clause body (without the keyword) into fragments
///
/// A `to_date` BETWEEN range anywhere in the clause is pulled out first and
/// the remainder is split again, so date ranges always lead the result.
pub fn split_clause(clause: &str, diags: &mut Diagnostics) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    split_into(clause, &mut fragments, diags);
    fragments
}

fn split_into(clause: &str, out: &mut Vec<Fragment>, diags: &mut Diagnostics) {
    if let Some((range, span)) = find_date_range(clause) {
        out.push(Fragment::DateRange(range));

        let remaining = format!("{}{}", &clause[..span.start], &clause[span.end..]);
        let remaining = LEADING_CONNECTOR.replace(remaining.trim(), "");
        if !remaining.trim().is_empty() {
            split_into(&remaining, out, diags);
        }
        return;
    }

    out.extend(split_predicates(clause, diags).into_iter().map(Fragment::Predicate));
}

/// Split on top-level `AND`/`OR` words, outside literals and comments
///
/// The `AND` that closes `x BETWEEN lo AND hi` stays inside its fragment.
fn split_predicates(clause: &str, diags: &mut Diagnostics) -> Vec<String> {
    let tokens = match tokenize(clause) {
        Ok(tokens) => tokens,
        Err(e) => {
            diags.warn(
                DiagnosticKind::TokenizerFallback,
                format!("Splitting clause on plain AND/OR: {}", e),
            );
            return split_predicates_lenient(clause);
        }
    };

    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut open_between = false;

    for (i, token) in tokens.iter().enumerate() {
        let text = token.text(clause);
        let is_and = is_keyword(&tokens, i, Keyword::AND);

        if token.is_comment() {
            current.push(' ');
        } else if is_and && open_between {
            open_between = false;
            current.push_str(text);
        } else if is_and || is_keyword(&tokens, i, Keyword::OR) {
            open_between = false;
            push_fragment(&mut fragments, &mut current);
        } else {
            if token.is_keyword(Keyword::BETWEEN) {
                open_between = true;
            }
            current.push_str(text);
        }
    }
    push_fragment(&mut fragments, &mut current);

    fragments
}

/// Regex split used when the clause does not tokenize
fn split_predicates_lenient(clause: &str) -> Vec<String> {
    AND_SEPARATOR
        .split(clause)
        .flat_map(|part| OR_SEPARATOR.split(part))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn push_fragment(fragments: &mut Vec<String>, current: &mut String) {
    let fragment = current.trim();
    if !fragment.is_empty() {
        fragments.push(fragment.to_string());
    }
    current.clear();
}
