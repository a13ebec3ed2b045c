use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

use crate::warnings::{Warning, emit};

mod parsers;

use parsers::{scan_word, skip_trivia};

lazy_static! {
    static ref POSITIONAL: Regex = Regex::new(r"%s\b").expect("positional placeholder regex");
    static ref NAMED: Regex =
        Regex::new(r"%\(([a-z]+)\)s\b").expect("named placeholder regex");
    static ref LEFTOVER: Regex =
        Regex::new(r"%[a-z]\b|%\([a-z]+\)[a-z]\b").expect("leftover placeholder regex");
}

/// Translate `%s` / `%(name)s` placeholders into SQLite's `?` / `:name`.
///
/// Only placeholder syntax is rewritten. Any other `%x` or `%(name)x` token that
/// survives the rewrite is reported through the warnings channel and left in
/// place; SQLite will report it as a syntax error if it is one.
///
/// ```rust
/// use pyformat_sqlite::translate;
///
/// let sql = translate("SELECT * FROM t WHERE a=%s AND b=%(bee)s");
/// assert_eq!(sql, "SELECT * FROM t WHERE a=? AND b=:bee");
/// ```
/// Returns a borrowed `Cow` when no changes are needed.
#[must_use]
pub fn translate(sql: &str) -> Cow<'_, str> {
    let positional = POSITIONAL.replace_all(sql, "?");
    let named = match NAMED.replace_all(&positional, ":${1}") {
        Cow::Owned(rewritten) => Some(rewritten),
        Cow::Borrowed(_) => None,
    };
    let translated = match named {
        Some(rewritten) => Cow::Owned(rewritten),
        None => positional,
    };

    let leftover = unsupported_placeholders(&translated);
    if !leftover.is_empty() {
        emit(&Warning::UnsupportedPlaceholder {
            tokens: leftover.iter().map(|t| (*t).to_string()).collect(),
        });
    }

    translated
}

/// Placeholder-shaped tokens the client API does not support, e.g. `%d`.
///
/// Meant to be run on already translated SQL; on untranslated SQL it also
/// reports the supported `%s` forms.
#[must_use]
pub fn unsupported_placeholders(sql: &str) -> Vec<&str> {
    LEFTOVER.find_iter(sql).map(|m| m.as_str()).collect()
}

/// Leading keyword of a statement, skipping whitespace and comments.
#[must_use]
pub fn statement_keyword(sql: &str) -> Option<&str> {
    let bytes = sql.as_bytes();
    let start = skip_trivia(bytes, 0);
    let end = scan_word(bytes, start);
    if end == start { None } else { Some(&sql[start..end]) }
}

/// Whether the statement changes rows (INSERT, UPDATE, DELETE, REPLACE).
#[must_use]
pub fn is_dml(sql: &str) -> bool {
    statement_keyword(sql).is_some_and(|kw| {
        ["INSERT", "UPDATE", "DELETE", "REPLACE"]
            .iter()
            .any(|dml| kw.eq_ignore_ascii_case(dml))
    })
}
