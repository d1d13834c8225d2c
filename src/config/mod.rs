//! Parser configuration
//!
//! Everything here has a sensible default, so most callers never build a
//! [`ParserConfig`] by hand. Hosts that want pt-BR operator labels or a
//! different set of recognised date layouts pass one in explicitly, either as
//! a struct or as JSON.

mod locale;

pub use locale::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Date and datetime layouts recognised by the value typer, in match order
pub const DEFAULT_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Options shared by parsing and reconstruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Which label table fills `operator_desc`
    pub label_locale: LabelLocale,
    /// chrono format strings tried in order when classifying a value as a date
    pub date_formats: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            label_locale: LabelLocale::default(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl ParserConfig {
    /// Deserialize from a JSON object; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_locale(mut self, locale: LabelLocale) -> Self {
        self.label_locale = locale;
        self
    }
}
