//! Warnings collected while parsing or reconstructing
//!
//! Nothing in this crate aborts on a bad fragment or a failed splice. Each
//! recoverable problem is recorded here and mirrored to `tracing` so callers
//! can surface it without installing a log subscriber.

use serde::Serialize;

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The statement has no WHERE clause
    NoWhereClause,
    /// The SQL tokenizer rejected the input and a regex scan was used instead
    TokenizerFallback,
    /// A predicate fragment matched no pattern and was dropped
    UnparseableFragment,
    /// The two `to_date` bounds use different format strings
    FormatMismatch,
    /// A value tagged `number` did not parse and was quoted as text
    NumberFallback,
    /// The primary splice failed and the regex fallback was used
    ReconstructFallback,
    /// Both reconstruction paths failed; the original query was kept
    ReconstructFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Ordered list of diagnostics for one call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and forward it to `tracing`
    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = ?kind, "{}", message);
        self.entries.push(Diagnostic { kind, message });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
