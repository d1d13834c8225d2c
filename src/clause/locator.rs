//! Finding the WHERE clause inside a statement
//!
//! The token scan walks every nesting level in source order, so the first
//! WHERE wins even when it belongs to a subquery or CTE. That is a known
//! limitation, not a guarantee of finding the top-level clause.

use crate::clause::tokens::{tokenize, SpannedToken};
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;
use std::ops::Range;

/// Keywords that close a WHERE clause at its own nesting level
const CLAUSE_TERMINATORS: [Keyword; 10] = [
    Keyword::HAVING,
    Keyword::WINDOW,
    Keyword::LIMIT,
    Keyword::OFFSET,
    Keyword::FETCH,
    Keyword::UNION,
    Keyword::EXCEPT,
    Keyword::INTERSECT,
    Keyword::RETURNING,
    Keyword::INTO,
];

/// Keywords that only close a clause when followed by one of the given words
const PAIRED_TERMINATORS: [(Keyword, &[Keyword]); 4] = [
    (Keyword::GROUP, &[Keyword::BY]),
    (Keyword::ORDER, &[Keyword::BY]),
    (Keyword::CONNECT, &[Keyword::BY]),
    (Keyword::FOR, &[Keyword::UPDATE, Keyword::SHARE, Keyword::NO, Keyword::KEY]),
];

static WHERE_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWHERE\b").unwrap());

static LENIENT_TERMINATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:GROUP\s+BY|ORDER\s+BY|CONNECT\s+BY|FOR\s+(?:UPDATE|SHARE|NO\s+KEY|KEY)",
        r"|HAVING|WINDOW|LIMIT|OFFSET|FETCH|UNION|EXCEPT|INTERSECT|RETURNING|INTO)\b|;",
    ))
    .unwrap()
});

/// Byte ranges of a located WHERE clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    /// The `WHERE` keyword itself
    pub keyword: Range<usize>,
    /// The predicate, trimmed of surrounding whitespace
    pub body: Range<usize>,
}

impl WhereClause {
    pub fn body<'a>(&self, sql: &'a str) -> &'a str {
        &sql[self.body.clone()]
    }
}

/// Locate the first WHERE clause at any depth using the SQL tokenizer
///
/// `Ok(None)` means the statement has no WHERE clause. Errors come only from
/// the tokenizer (unterminated literals or comments).
pub fn locate_where(sql: &str) -> Result<Option<WhereClause>> {
    let tokens = tokenize(sql)?;

    for (i, token) in tokens.iter().enumerate() {
        if is_keyword(&tokens, i, Keyword::WHERE) {
            let body = clause_body(&tokens, i + 1, sql);
            return Ok(Some(WhereClause {
                keyword: token.span.clone(),
                body,
            }));
        }
    }

    Ok(None)
}

/// Regex scan used when the tokenizer rejects the statement
///
/// Takes the first `WHERE` word and runs to the next clause keyword or `;`.
/// Quoting and nesting are ignored.
pub fn locate_where_lenient(sql: &str) -> Option<WhereClause> {
    let keyword = WHERE_KEYWORD.find(sql)?;
    let rest = &sql[keyword.end()..];
    let end = LENIENT_TERMINATOR
        .find(rest)
        .map(|m| keyword.end() + m.start())
        .unwrap_or(sql.len());

    Some(WhereClause {
        keyword: keyword.start()..keyword.end(),
        body: trim_range(sql, keyword.end()..end),
    })
}

/// Where a new WHERE clause goes in a statement that has none
///
/// Before the first top-level `GROUP BY`, `ORDER BY`, `HAVING`, `LIMIT`,
/// locking clause, set operation or `;`, otherwise after the last
/// meaningful token.
pub fn insertion_point(sql: &str) -> Result<usize> {
    let tokens = tokenize(sql)?;
    let mut depth = 0usize;
    let mut last_end = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match token.token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::SemiColon if depth == 0 => return Ok(last_end),
            Token::Word(_)
                if depth == 0
                    && !is_keyword(&tokens, i, Keyword::INTO)
                    && is_terminator(&tokens, i) =>
            {
                return Ok(last_end);
            }
            _ => {}
        }
        if !token.is_trivia() {
            last_end = token.span.end;
        }
    }

    Ok(last_end)
}

/// Body range starting at token `from`, up to the clause terminator
fn clause_body(tokens: &[SpannedToken], from: usize, sql: &str) -> Range<usize> {
    let mut depth = 0usize;
    let mut first: Option<usize> = None;
    let mut last_end: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate().skip(from) {
        match token.token {
            Token::RParen if depth == 0 => break,
            Token::SemiColon if depth == 0 => break,
            Token::Word(_) if depth == 0 && is_terminator(tokens, i) => break,
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            _ => {}
        }
        if !token.is_trivia() {
            first.get_or_insert(token.span.start);
            last_end = Some(token.span.end);
        }
    }

    match (first, last_end) {
        (Some(start), Some(end)) => start..end,
        _ => {
            let at = tokens.get(from).map(|t| t.span.start).unwrap_or(sql.len());
            at..at
        }
    }
}

fn is_terminator(tokens: &[SpannedToken], i: usize) -> bool {
    if CLAUSE_TERMINATORS
        .iter()
        .any(|kw| is_keyword(tokens, i, *kw))
    {
        return true;
    }
    PAIRED_TERMINATORS.iter().any(|(kw, followers)| {
        is_keyword(tokens, i, *kw)
            && next_significant(tokens, i)
                .is_some_and(|t| followers.iter().any(|f| t.is_keyword(*f)))
    })
}

/// `keyword` at `i`, unless it is the member part of `alias.keyword`
pub(crate) fn is_keyword(tokens: &[SpannedToken], i: usize, keyword: Keyword) -> bool {
    tokens[i].is_keyword(keyword)
        && !previous_significant(tokens, i).is_some_and(|t| t.token == Token::Period)
}

fn next_significant(tokens: &[SpannedToken], i: usize) -> Option<&SpannedToken> {
    tokens[i + 1..].iter().find(|t| !t.is_trivia())
}

fn previous_significant(tokens: &[SpannedToken], i: usize) -> Option<&SpannedToken> {
    tokens[..i].iter().rev().find(|t| !t.is_trivia())
}

fn trim_range(sql: &str, range: Range<usize>) -> Range<usize> {
    let slice = &sql[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = range.end - (slice.len() - slice.trim_end().len());
    if start > end {
        start..start
    } else {
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(sql: &str) -> Option<String> {
        locate_where(sql)
            .unwrap()
            .map(|clause| clause.body(sql).to_string())
    }

    #[test]
    fn test_simple_where() {
        assert_eq!(
            body("SELECT * FROM t WHERE a = 1 AND b = 2").as_deref(),
            Some("a = 1 AND b = 2")
        );
    }

    #[test]
    fn test_no_where() {
        assert_eq!(body("SELECT * FROM t"), None);
        assert_eq!(body("SELECT 'WHERE x' FROM t -- where"), None);
    }

    #[test]
    fn test_stops_at_trailing_clauses() {
        assert_eq!(
            body("SELECT a FROM t WHERE a > 1 GROUP BY a ORDER BY a").as_deref(),
            Some("a > 1")
        );
        assert_eq!(
            body("SELECT a FROM t WHERE a > 1\nLIMIT 5").as_deref(),
            Some("a > 1")
        );
        assert_eq!(body("DELETE FROM t WHERE id = 3;").as_deref(), Some("id = 3"));
    }

    #[test]
    fn test_stops_at_locking_and_paging_clauses() {
        assert_eq!(
            body("SELECT * FROM t WHERE a = 1 FOR UPDATE").as_deref(),
            Some("a = 1")
        );
        assert_eq!(
            body("SELECT * FROM t WHERE a = 1 FOR SHARE NOWAIT").as_deref(),
            Some("a = 1")
        );
        assert_eq!(
            body("SELECT * FROM t WHERE a = 1 ORDER BY a OFFSET 5 ROWS").as_deref(),
            Some("a = 1")
        );
        assert_eq!(
            body("SELECT * FROM t WHERE a = 1 OFFSET 10").as_deref(),
            Some("a = 1")
        );
        assert_eq!(
            body("SELECT * FROM t WHERE a = 1 FETCH FIRST 5 ROWS ONLY").as_deref(),
            Some("a = 1")
        );
        assert_eq!(
            body("SELECT a FROM t WHERE a > 1 WINDOW w AS (PARTITION BY a)").as_deref(),
            Some("a > 1")
        );
    }

    #[test]
    fn test_for_without_lock_word_is_not_terminator() {
        assert_eq!(
            body("SELECT * FROM t WHERE for_id = 1 AND t.for = 2").as_deref(),
            Some("for_id = 1 AND t.for = 2")
        );
    }

    #[test]
    fn test_lenient_locator_stops_at_locking_clause() {
        let sql = "SELECT * FROM t WHERE a = 'x FOR UPDATE";
        assert_eq!(locate_where_lenient(sql).unwrap().body(sql), "a = 'x");
        let sql = "SELECT * FROM t WHERE a = 'x FETCH FIRST 1 ROWS ONLY";
        assert_eq!(locate_where_lenient(sql).unwrap().body(sql), "a = 'x");
    }

    #[test]
    fn test_group_without_by_is_not_terminator() {
        assert_eq!(
            body("SELECT * FROM t WHERE group = 'x'").as_deref(),
            Some("group = 'x'")
        );
    }

    #[test]
    fn test_qualified_keyword_is_not_terminator() {
        assert_eq!(
            body("SELECT * FROM t WHERE t.limit > 3").as_deref(),
            Some("t.limit > 3")
        );
    }

    #[test]
    fn test_first_where_in_subquery() {
        let sql = "SELECT * FROM (SELECT id FROM x WHERE x.k = 1) s WHERE s.id > 2";
        assert_eq!(body(sql).as_deref(), Some("x.k = 1"));
    }

    #[test]
    fn test_parenthesised_predicate_kept() {
        let sql = "SELECT * FROM t WHERE (a = 1 OR b = 2) AND c IN (1, 2) ORDER BY c";
        assert_eq!(body(sql).as_deref(), Some("(a = 1 OR b = 2) AND c IN (1, 2)"));
    }

    #[test]
    fn test_multiline_body() {
        let sql = "SELECT *\nFROM t\nWHERE a = 1\n  AND b = 2\n";
        assert_eq!(body(sql).as_deref(), Some("a = 1\n  AND b = 2"));
    }

    #[test]
    fn test_trailing_comment_outside_body() {
        let sql = "SELECT * FROM t WHERE a = 1 -- only active
ORDER BY a";
        assert_eq!(body(sql).as_deref(), Some("a = 1"));
    }

    #[test]
    fn test_empty_body() {
        let sql = "SELECT * FROM t WHERE";
        let clause = locate_where(sql).unwrap().unwrap();
        assert!(clause.body.is_empty());
    }

    #[test]
    fn test_tokenizer_error_propagates() {
        assert!(locate_where("SELECT * FROM t WHERE a = 'x").is_err());
    }

    #[test]
    fn test_lenient_locator() {
        let sql = "SELECT * FROM t WHERE a = 'x ORDER BY a";
        let clause = locate_where_lenient(sql).unwrap();
        assert_eq!(clause.body(sql), "a = 'x");
        assert!(locate_where_lenient("SELECT 1").is_none());
    }

    #[test]
    fn test_insertion_point() {
        let sql = "SELECT * FROM t ORDER BY a";
        assert_eq!(insertion_point(sql).unwrap(), "SELECT * FROM t".len());

        let sql = "SELECT * FROM t;";
        assert_eq!(insertion_point(sql).unwrap(), "SELECT * FROM t".len());

        let sql = "SELECT * FROM t  -- trailing\n";
        assert_eq!(insertion_point(sql).unwrap(), "SELECT * FROM t".len());

        let sql = "SELECT * FROM (SELECT a FROM x ORDER BY a) s";
        assert_eq!(insertion_point(sql).unwrap(), sql.len());

        let sql = "SELECT * FROM t FOR UPDATE";
        assert_eq!(insertion_point(sql).unwrap(), "SELECT * FROM t".len());
    }
}
