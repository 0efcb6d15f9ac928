//! Querying the FTS5 indexes.
//!
//! Index *maintenance* is not done here: the triggers in
//! [`super::schema`] update the index as part of every primary mutation.
//! This module only turns a caller's term into a safe match expression and
//! the join that scopes a primary-table query to the index hits.
//!
//! Matching is by token prefix: `"jour"` hits a row containing `journal`, but
//! `"urnal"` does not. Every token of the term must hit (AND). Caller input
//! never reaches the FTS5 parser unquoted, so index syntax characters in a
//! term (`*`, `:`, `"`, `NEAR`, parentheses) are searched as plain text.

use tracing::debug;

/// A caller's term, sanitized and scoped to one column of one index.
///
/// Hits are never materialized as a rowid list: stores splice
/// [`IndexMatch::join`] into their own `SELECT` and bind
/// [`IndexMatch::expression`] as `?1`, so the primary rows come back in one
/// statement and in the store's own order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMatch {
    index: &'static str,
    expression: String,
}

impl IndexMatch {
    /// `None` when the term has no tokens; callers treat that as no matches.
    pub fn prepare(index: &'static str, column: &str, term: &str) -> Option<Self> {
        let Some(expression) = match_expression(column, term) else {
            debug!(index, term, "Search term has no tokens");
            return None;
        };
        debug!(index, expression = %expression, "Index match");
        Some(Self { index, expression })
    }

    /// `JOIN <index> ON <index>.rowid = <key> WHERE <index> MATCH ?1`
    pub fn join(&self, key: &str) -> String {
        format!(
            "JOIN {index} ON {index}.rowid = {key} WHERE {index} MATCH ?1",
            index = self.index,
            key = key
        )
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// Splits a term into the word tokens the index tokenizer would produce.
pub fn tokens(term: &str) -> Vec<&str> {
    term.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Builds a column-scoped prefix match, or `None` when the term has no tokens.
pub fn match_expression(column: &str, term: &str) -> Option<String> {
    let clauses: Vec<String> = tokens(term)
        .into_iter()
        .map(|token| format!("{} : {} *", column, quote(token)))
        .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" AND "))
    }
}

fn quote(token: &str) -> String {
    format!("\"{}\"", token.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::{self, Schema};
    use rusqlite::Connection;

    fn entry_conn(texts: &[&str]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::apply(&conn, Schema::Entries).unwrap();
        for text in texts {
            conn.execute(
                "INSERT INTO entry (text, color, created, modified) VALUES (?1, 0, 0, 0)",
                [text],
            )
            .unwrap();
        }
        conn
    }

    fn hit_ids(conn: &Connection, term: &str) -> rusqlite::Result<Vec<i64>> {
        let Some(m) = IndexMatch::prepare("entry_index", "text", term) else {
            return Ok(Vec::new());
        };
        let sql = format!("SELECT entry.id FROM entry {} ORDER BY entry.id", m.join("entry.id"));
        let mut stmt = conn.prepare(&sql)?;
        let ids = stmt
            .query_map([m.expression()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    #[test]
    fn tokenizes_on_non_alphanumerics() {
        assert_eq!(tokens("foo bar"), vec!["foo", "bar"]);
        assert_eq!(tokens("  tag:work*  "), vec!["tag", "work"]);
        assert!(tokens("\"*:()").is_empty());
    }

    #[test]
    fn builds_scoped_prefix_expression() {
        assert_eq!(
            match_expression("text", "foo bar").unwrap(),
            r#"text : "foo" * AND text : "bar" *"#
        );
        assert_eq!(match_expression("tags", "   "), None);
    }

    #[test]
    fn tokenless_term_prepares_nothing() {
        assert!(IndexMatch::prepare("entry_index", "text", "").is_none());
        assert!(IndexMatch::prepare("entry_index", "text", "\"*").is_none());
    }

    #[test]
    fn join_scopes_to_index() {
        let m = IndexMatch::prepare("document_index", "tags", "x").unwrap();
        assert_eq!(
            m.join("document.rowid"),
            "JOIN document_index ON document_index.rowid = document.rowid WHERE document_index MATCH ?1"
        );
        assert_eq!(m.expression(), r#"tags : "x" *"#);
    }

    #[test]
    fn matches_by_prefix_not_substring() {
        let conn = entry_conn(&["journal entry", "other"]);
        assert_eq!(hit_ids(&conn, "jour").unwrap(), vec![1]);
        assert!(hit_ids(&conn, "urnal").unwrap().is_empty());
    }

    #[test]
    fn empty_index_has_no_hits() {
        let conn = entry_conn(&[]);
        assert!(hit_ids(&conn, "anything").unwrap().is_empty());
    }

    #[test]
    fn syntax_characters_do_not_break_queries() {
        let conn = entry_conn(&["foo bar"]);
        for term in ["foo\"", "foo*", "text:foo", "NEAR(foo", "foo OR", "\"\"", "-"] {
            assert!(hit_ids(&conn, term).is_ok(), "term {:?} failed", term);
        }
        assert!(hit_ids(&conn, "foo OR").unwrap().is_empty());
    }
}
