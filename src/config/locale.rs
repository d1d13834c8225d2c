//! Operator label tables

use crate::condition::Operator;
use crate::error::WhereClauseError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language of the human-readable operator labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelLocale {
    #[default]
    #[serde(rename = "en", alias = "EN")]
    En,
    #[serde(rename = "pt-BR", alias = "pt_br", alias = "pt-br")]
    PtBr,
}

impl FromStr for LabelLocale {
    type Err = WhereClauseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" => Ok(LabelLocale::En),
            "pt-br" => Ok(LabelLocale::PtBr),
            other => Err(WhereClauseError::Config(serde::de::Error::custom(format!(
                "unknown label locale: {}",
                other
            )))),
        }
    }
}

/// Static label for an operator; informational only, never parsed back
pub fn operator_label(operator: Operator, locale: LabelLocale) -> &'static str {
    match locale {
        LabelLocale::En => match operator {
            Operator::Equal => "equals",
            Operator::NotEqual | Operator::NotEqualAnsi => "not equal",
            Operator::Greater => "greater than",
            Operator::Less => "less than",
            Operator::GreaterEqual => "greater than or equal",
            Operator::LessEqual => "less than or equal",
            Operator::Like => "contains",
            Operator::NotLike => "does not contain",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Between => "between",
            Operator::NotBetween => "not between",
            Operator::IsNull => "is null",
            Operator::IsNotNull => "is not null",
        },
        LabelLocale::PtBr => match operator {
            Operator::Equal => "igual",
            Operator::NotEqual | Operator::NotEqualAnsi => "diferente",
            Operator::Greater => "maior",
            Operator::Less => "menor",
            Operator::GreaterEqual => "maior ou igual",
            Operator::LessEqual => "menor ou igual",
            Operator::Like => "contém",
            Operator::NotLike => "não contém",
            Operator::In => "em",
            Operator::NotIn => "não em",
            Operator::Between => "entre",
            Operator::NotBetween => "não entre",
            Operator::IsNull => "é nulo",
            Operator::IsNotNull => "não é nulo",
        },
    }
}
