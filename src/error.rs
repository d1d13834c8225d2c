//! Error types for the WHERE clause editor

#[cfg(feature = "python")]
use pyo3::exceptions::{PyRuntimeError, PyValueError};
#[cfg(feature = "python")]
use pyo3::PyErr;
use sqlparser::tokenizer::TokenizerError;
use thiserror::Error;

/// Main error type for the WHERE clause editor
///
/// None of these escape [`crate::parse_conditions`] or [`crate::reconstruct`];
/// the entry points turn them into diagnostics and best-effort results.
#[derive(Error, Debug)]
pub enum WhereClauseError {
    #[error("SQL tokenizer error: {0}")]
    Tokenize(#[from] TokenizerError),

    #[error("Unparseable condition: {0}")]
    UnparseableCondition(String),

    #[error("Invalid value for {operator}: {reason}")]
    InvalidValue { operator: String, reason: String },

    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("WHERE clause not found")]
    WhereNotFound,

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(feature = "python")]
impl From<WhereClauseError> for PyErr {
    fn from(err: WhereClauseError) -> PyErr {
        match err {
            WhereClauseError::InvalidValue { .. }
            | WhereClauseError::InvalidOperator(_)
            | WhereClauseError::UnparseableCondition(_)
            | WhereClauseError::Config(_) => PyValueError::new_err(err.to_string()),
            WhereClauseError::Tokenize(_)
            | WhereClauseError::WhereNotFound => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Result type alias for the WHERE clause editor
pub type Result<T> = std::result::Result<T, WhereClauseError>;
