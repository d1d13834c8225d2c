//! Structured conditions extracted from a WHERE clause

use crate::config::{operator_label, LabelLocale};
use crate::error::WhereClauseError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered, implicitly AND-joined conditions
pub type ConditionList = Vec<Condition>;

/// One predicate of a WHERE clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Position within the list it was parsed into; cosmetic on the way back
    #[serde(default)]
    pub id: usize,
    /// Left-hand side exactly as written, e.g. `t.created_at`
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub operator_desc: String,
    #[serde(default)]
    pub value: ConditionValue,
    /// Bare `to_date` parameters, present only for function bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<Vec<String>>,
    #[serde(rename = "type", default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub is_function: bool,
    /// Operands were written as bare SQL (`:id`, `SYSDATE`, `a.y`) and are
    /// kept and rendered exactly as written
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_expression: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: ConditionValue,
        value_type: ValueType,
    ) -> Self {
        Self {
            id: 0,
            field: field.into(),
            operator,
            operator_desc: operator_label(operator, LabelLocale::default()).to_string(),
            value,
            original_value: None,
            value_type,
            is_function: false,
            is_expression: false,
            function_name: None,
            format: None,
        }
    }

    /// Refill `operator_desc` from the label table of `locale`
    pub fn with_locale(mut self, locale: LabelLocale) -> Self {
        self.operator_desc = operator_label(self.operator, locale).to_string();
        self
    }

    pub fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }
}

/// Comparison operators understood by the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Operator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<>`
    NotEqualAnsi,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub const ALL: [Operator; 15] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::NotEqualAnsi,
        Operator::Greater,
        Operator::Less,
        Operator::GreaterEqual,
        Operator::LessEqual,
        Operator::Like,
        Operator::NotLike,
        Operator::In,
        Operator::NotIn,
        Operator::Between,
        Operator::NotBetween,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::NotEqualAnsi => "<>",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    pub fn is_null_check(self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    pub fn is_range(self) -> bool {
        matches!(self, Operator::Between | Operator::NotBetween)
    }

    pub fn is_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    pub(crate) fn between(negated: bool) -> Self {
        if negated {
            Operator::NotBetween
        } else {
            Operator::Between
        }
    }

    pub(crate) fn in_list(negated: bool) -> Self {
        if negated {
            Operator::NotIn
        } else {
            Operator::In
        }
    }

    pub(crate) fn null_check(negated: bool) -> Self {
        if negated {
            Operator::IsNotNull
        } else {
            Operator::IsNull
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl From<Operator> for &'static str {
    fn from(op: Operator) -> Self {
        op.as_sql()
    }
}

impl FromStr for Operator {
    type Err = WhereClauseError;

    /// Case-insensitive; runs of whitespace inside `NOT LIKE` etc. collapse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        Operator::ALL
            .into_iter()
            .find(|op| op.as_sql() == normalized)
            .ok_or_else(|| WhereClauseError::InvalidOperator(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = WhereClauseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// No operand (`IS NULL`, `IS NOT NULL`)
    #[default]
    Null,
    Scalar(String),
    /// `BETWEEN` bounds
    Pair(String, String),
    /// `IN` members
    List(Vec<String>),
}

impl ConditionValue {
    /// Operand strings in order; empty for `Null`
    pub fn parts(&self) -> Vec<&str> {
        match self {
            ConditionValue::Null => Vec::new(),
            ConditionValue::Scalar(s) => vec![s.as_str()],
            ConditionValue::Pair(lo, hi) => vec![lo.as_str(), hi.as_str()],
            ConditionValue::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConditionValue::Null)
    }
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Editors send numbers as well as strings; keep their JSON spelling.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawScalar {
            Text(String),
            Number(serde_json::Number),
        }

        impl RawScalar {
            fn into_string(self) -> String {
                match self {
                    RawScalar::Text(s) => s,
                    RawScalar::Number(n) => n.to_string(),
                }
            }
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawValue {
            One(RawScalar),
            Many(Vec<RawScalar>),
        }

        Ok(match Option::<RawValue>::deserialize(deserializer)? {
            None => ConditionValue::Null,
            Some(RawValue::One(s)) => ConditionValue::Scalar(s.into_string()),
            Some(RawValue::Many(items)) => {
                ConditionValue::List(items.into_iter().map(RawScalar::into_string).collect())
            }
        })
    }
}

/// Heuristic type of a literal, assigned once at parse time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    Date,
    #[default]
    Text,
    Null,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::Date => "date",
            ValueType::Text => "text",
            ValueType::Null => "null",
        }
    }

    /// Lookup by lowercase-insensitive name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "number" => Some(ValueType::Number),
            "date" => Some(ValueType::Date),
            "text" => Some(ValueType::Text),
            "null" => Some(ValueType::Null),
            _ => None,
        }
    }
}
