//! Conversion between Python dicts and condition types
//!
//! Inputs may be plain dicts or any object exposing the same attributes.

use crate::condition::{Condition, ConditionValue, Operator, ValueType};
use crate::config::ParserConfig;
use crate::diagnostics::Diagnostics;
use crate::{ParseOutcome, Reconstruction};
use pyo3::prelude::*;
use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods, PyList, PyListMethods, PyTuple};

/// Helper to get attribute from either dict or object
fn get_attr<'py>(obj: &Bound<'py, PyAny>, name: &str) -> PyResult<Bound<'py, PyAny>> {
    if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name)?
            .ok_or_else(|| pyo3::exceptions::PyKeyError::new_err(name.to_string()))
    } else {
        obj.getattr(name)
    }
}

/// Helper to get optional attribute, treating `None` as absent
fn get_attr_opt<'py>(obj: &Bound<'py, PyAny>, name: &str) -> Option<Bound<'py, PyAny>> {
    let value = if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name).ok().flatten()
    } else {
        obj.getattr(name).ok()
    };
    value.filter(|v| !v.is_none())
}

/// Build a [`ParserConfig`] from `{"label_locale": ..., "date_formats": [...]}`
pub fn extract_config(obj: &Bound<'_, PyAny>) -> PyResult<ParserConfig> {
    let mut config = ParserConfig::default();

    if let Some(locale) = get_attr_opt(obj, "label_locale") {
        let locale: String = locale.extract()?;
        config.label_locale = locale.parse()?;
    }
    if let Some(formats) = get_attr_opt(obj, "date_formats") {
        config.date_formats = formats.extract()?;
    }

    Ok(config)
}

/// Read one edited condition
///
/// Only `field` and `operator` are required. Numbers and other scalars in
/// `value` are taken by their `str()`.
pub fn extract_condition(obj: &Bound<'_, PyAny>) -> PyResult<Condition> {
    let field: String = get_attr(obj, "field")?.extract()?;
    let operator: Operator = get_attr(obj, "operator")?.extract::<String>()?.parse()?;

    let value = match get_attr_opt(obj, "value") {
        Some(value) => extract_value(&value)?,
        None => ConditionValue::Null,
    };
    let value_type = get_attr_opt(obj, "type")
        .and_then(|t| t.extract::<String>().ok())
        .and_then(|t| ValueType::from_name(&t))
        .unwrap_or_default();

    let mut condition = Condition::new(field, operator, value, value_type);
    if let Some(id) = get_attr_opt(obj, "id") {
        condition.id = id.extract().unwrap_or_default();
    }
    if let Some(original) = get_attr_opt(obj, "original_value") {
        condition.original_value = Some(extract_strings(&original)?);
    }
    if let Some(is_function) = get_attr_opt(obj, "is_function") {
        condition.is_function = is_function.is_truthy()?;
    }
    if let Some(is_expression) = get_attr_opt(obj, "is_expression") {
        condition.is_expression = is_expression.is_truthy()?;
    }
    if let Some(name) = get_attr_opt(obj, "function_name") {
        condition.function_name = Some(name.extract()?);
    }
    if let Some(format) = get_attr_opt(obj, "format") {
        condition.format = Some(format.extract()?);
    }

    Ok(condition)
}

fn extract_value(obj: &Bound<'_, PyAny>) -> PyResult<ConditionValue> {
    if obj.downcast::<PyList>().is_ok() || obj.downcast::<PyTuple>().is_ok() {
        return Ok(ConditionValue::List(extract_strings(obj)?));
    }
    Ok(ConditionValue::Scalar(scalar_text(obj)?))
}

fn extract_strings(obj: &Bound<'_, PyAny>) -> PyResult<Vec<String>> {
    obj.try_iter()?
        .map(|item| scalar_text(&item?))
        .collect()
}

fn scalar_text(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    if let Ok(text) = obj.extract::<String>() {
        return Ok(text);
    }
    Ok(obj.str()?.to_string())
}

pub fn condition_to_dict<'py>(
    py: Python<'py>,
    condition: &Condition,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("id", condition.id)?;
    dict.set_item("field", condition.field.as_str())?;
    dict.set_item("operator", condition.operator.as_sql())?;
    dict.set_item("operator_desc", condition.operator_desc.as_str())?;

    match &condition.value {
        ConditionValue::Null => dict.set_item("value", py.None())?,
        ConditionValue::Scalar(value) => dict.set_item("value", value.as_str())?,
        other => dict.set_item("value", PyList::new(py, other.parts())?)?,
    }
    if let Some(original) = &condition.original_value {
        dict.set_item("original_value", PyList::new(py, original)?)?;
    }

    dict.set_item("type", condition.value_type.as_str())?;
    dict.set_item("is_function", condition.is_function)?;
    if condition.is_expression {
        dict.set_item("is_expression", true)?;
    }
    if let Some(name) = &condition.function_name {
        dict.set_item("function_name", name.as_str())?;
    }
    if let Some(format) = &condition.format {
        dict.set_item("format", format.as_str())?;
    }

    Ok(dict)
}

fn warnings_to_list<'py>(
    py: Python<'py>,
    warnings: &Diagnostics,
) -> PyResult<Bound<'py, PyList>> {
    PyList::new(py, warnings.iter().map(|w| w.message.as_str()))
}

/// `{"status": ..., "conditions": [...], "warnings": [...]}`
pub fn outcome_to_dict<'py>(
    py: Python<'py>,
    outcome: &ParseOutcome,
) -> PyResult<Bound<'py, PyDict>> {
    let conditions = PyList::empty(py);
    for condition in &outcome.conditions {
        conditions.append(condition_to_dict(py, condition)?)?;
    }

    let status = match outcome.status {
        crate::ParseStatus::Success => "success",
        crate::ParseStatus::NoWhere => "no_where",
    };

    let dict = PyDict::new(py);
    dict.set_item("status", status)?;
    dict.set_item("conditions", conditions)?;
    dict.set_item("warnings", warnings_to_list(py, &outcome.warnings)?)?;
    Ok(dict)
}

/// `{"query": ..., "warnings": [...]}`
pub fn reconstruction_to_dict<'py>(
    py: Python<'py>,
    rebuilt: &Reconstruction,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("query", rebuilt.query.as_str())?;
    dict.set_item("warnings", warnings_to_list(py, &rebuilt.warnings)?)?;
    Ok(dict)
}
