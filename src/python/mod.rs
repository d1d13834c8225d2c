//! Python bindings
//!
//! Exposes the two entry points with plain dicts and lists on the Python
//! side. Like the Rust API, neither function raises on malformed SQL;
//! only unreadable condition dicts raise.

mod convert;

use crate::config::ParserConfig;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList, PyListMethods};

/// Parse the WHERE clause of `query` into a list of condition dicts
///
/// # Arguments
/// * `query` - Full SQL statement
/// * `config` - Optional `{"label_locale": "en" | "pt-BR", "date_formats": [...]}`
///
/// # Returns
/// `{"status": "success" | "no_where", "conditions": [...], "warnings": [...]}`
#[pyfunction]
#[pyo3(signature = (query, config=None))]
fn parse_sql_query<'py>(
    py: Python<'py>,
    query: &str,
    config: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyDict>> {
    let config = match config {
        Some(obj) => convert::extract_config(obj)?,
        None => ParserConfig::default(),
    };
    let outcome = crate::parse_conditions_with(query, &config);
    convert::outcome_to_dict(py, &outcome)
}

/// Rebuild `original_query` around the edited condition dicts
///
/// Returns the new statement, or the original one when it cannot be rebuilt.
#[pyfunction]
fn reconstruct_sql_query(
    original_query: &str,
    modified_conditions: &Bound<'_, PyList>,
) -> PyResult<String> {
    let conditions = modified_conditions
        .iter()
        .map(|item| convert::extract_condition(&item))
        .collect::<PyResult<Vec<_>>>()?;
    Ok(crate::reconstruct(original_query, &conditions).query)
}

/// Like [`reconstruct_sql_query`] but also returns the warnings
#[pyfunction]
fn reconstruct_sql_query_verbose<'py>(
    py: Python<'py>,
    original_query: &str,
    modified_conditions: &Bound<'py, PyList>,
) -> PyResult<Bound<'py, PyDict>> {
    let conditions = modified_conditions
        .iter()
        .map(|item| convert::extract_condition(&item))
        .collect::<PyResult<Vec<_>>>()?;
    let rebuilt = crate::reconstruct(original_query, &conditions);
    convert::reconstruction_to_dict(py, &rebuilt)
}

/// Python module definition
#[pymodule]
fn sql_where_editor(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_sql_query, m)?)?;
    m.add_function(wrap_pyfunction!(reconstruct_sql_query, m)?)?;
    m.add_function(wrap_pyfunction!(reconstruct_sql_query_verbose, m)?)?;
    Ok(())
}
