//! Condition extraction
//!
//! This module turns a WHERE clause body like `a = 1 AND b IN ('x', 'y')`
//! into a flat list of structured [`Condition`]s.

mod ast;
pub mod matcher;
pub mod splitter;

#[cfg(test)]
mod property_tests;

pub use ast::*;
pub use matcher::*;
pub use splitter::*;

use crate::config::ParserConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Split a clause body and match every fragment, numbering from 0
///
/// Fragments that match no pattern are dropped with a warning.
pub fn extract_conditions(
    clause: &str,
    config: &ParserConfig,
    diags: &mut Diagnostics,
) -> ConditionList {
    let mut conditions = ConditionList::new();

    for fragment in split_clause(clause, diags) {
        let parsed = match fragment {
            Fragment::DateRange(range) => Ok(range.into_condition(config, diags)),
            Fragment::Predicate(text) => match_condition(&text, config, diags),
        };

        match parsed {
            Ok(condition) => {
                let id = conditions.len();
                conditions.push(condition.with_id(id));
            }
            Err(e) => diags.warn(DiagnosticKind::UnparseableFragment, e.to_string()),
        }
    }

    conditions
}
