//! SQL tokens with byte spans
//!
//! Tokenizing is done by `sqlparser` with the generic dialect. Its
//! line/column locations are mapped back onto byte ranges of the source so
//! callers can slice and splice the original text.

use crate::error::Result;
use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Location, Token, Tokenizer, Whitespace};
use std::ops::Range;

/// A `sqlparser` token and the bytes it covers
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Range<usize>,
}

impl SpannedToken {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    /// Whitespace and comments carry no meaning for keyword scanning
    pub fn is_trivia(&self) -> bool {
        matches!(self.token, Token::Whitespace(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self.token,
            Token::Whitespace(
                Whitespace::SingleLineComment { .. } | Whitespace::MultiLineComment(_)
            )
        )
    }

    /// An unquoted word spelling `keyword`
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.token, Token::Word(w) if w.quote_style.is_none() && w.keyword == keyword)
    }
}

/// Tokenize `source`; the spans of the result cover every byte in order
///
/// Unterminated literals and comments are errors.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>> {
    let dialect = GenericDialect {};
    let tokens = Tokenizer::new(&dialect, source).tokenize_with_location()?;
    let lines = LineIndex::new(source);

    Ok(tokens
        .into_iter()
        .map(|t| SpannedToken {
            span: lines.offset(source, t.span.start)..lines.offset(source, t.span.end),
            token: t.token,
        })
        .collect())
}

/// Byte offset of every line start
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// Locations are 1-based and count characters, not bytes
    fn offset(&self, source: &str, location: Location) -> usize {
        let line = (location.line as usize).saturating_sub(1);
        let Some(&start) = self.starts.get(line) else {
            return source.len();
        };
        let end = self.starts.get(line + 1).copied().unwrap_or(source.len());
        let column = (location.column as usize).saturating_sub(1);

        source[start..end]
            .char_indices()
            .nth(column)
            .map(|(i, _)| start + i)
            .unwrap_or(end)
    }
}
