//! SQL WHERE Editor - parse a WHERE clause into editable conditions and back
//!
//! [`parse_conditions`] pulls the predicate out of a statement and turns it
//! into a flat, AND-joined [`ConditionList`]. [`reconstruct`] renders an
//! edited list back into the statement, leaving everything outside the
//! WHERE clause as written. Neither entry point fails: problems are
//! reported as [`Diagnostics`] next to a best-effort result.
//!
//! Python bindings are available behind the `python` feature.

pub mod clause;
pub mod condition;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod value;

#[cfg(feature = "python")]
mod python;

pub use clause::ReconstructPath;
pub use condition::{Condition, ConditionList, ConditionValue, Operator, ValueType};
pub use config::{LabelLocale, ParserConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{Result, WhereClauseError};

use crate::clause::{locate_where, locate_where_lenient, reconstruct_query};
use crate::condition::extract_conditions;
use serde::Serialize;

/// Whether a WHERE clause was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Success,
    NoWhere,
}

/// Result of [`parse_conditions`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    pub status: ParseStatus,
    pub conditions: ConditionList,
    pub warnings: Diagnostics,
}

/// Result of [`reconstruct`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconstruction {
    pub query: String,
    pub path: ReconstructPath,
    pub warnings: Diagnostics,
}

/// Parse the conditions of `query` with the default configuration
pub fn parse_conditions(query: &str) -> ParseOutcome {
    parse_conditions_with(query, &ParserConfig::default())
}

/// Parse the conditions of `query`
///
/// Statements without a WHERE clause yield [`ParseStatus::NoWhere`] and an
/// empty list. Fragments no pattern recognises are dropped and reported.
pub fn parse_conditions_with(query: &str, config: &ParserConfig) -> ParseOutcome {
    let mut warnings = Diagnostics::new();

    let located = match locate_where(query) {
        Ok(located) => located,
        Err(e) => {
            warnings.warn(
                DiagnosticKind::TokenizerFallback,
                format!("Locating WHERE by pattern: {}", e),
            );
            locate_where_lenient(query)
        }
    };

    let Some(located) = located else {
        warnings.warn(DiagnosticKind::NoWhereClause, "No WHERE clause found in query");
        return ParseOutcome {
            status: ParseStatus::NoWhere,
            conditions: ConditionList::new(),
            warnings,
        };
    };

    let conditions = extract_conditions(located.body(query), config, &mut warnings);
    tracing::debug!(count = conditions.len(), "parsed WHERE conditions");

    ParseOutcome {
        status: ParseStatus::Success,
        conditions,
        warnings,
    }
}

/// Rebuild `original` so its WHERE clause holds exactly `conditions`
///
/// An empty list removes the WHERE clause. On any failure the original
/// statement is returned unchanged with a warning.
pub fn reconstruct(original: &str, conditions: &[Condition]) -> Reconstruction {
    let mut warnings = Diagnostics::new();
    let (query, path) = reconstruct_query(original, conditions, &mut warnings);
    Reconstruction {
        query,
        path,
        warnings,
    }
}
