//! The document strategy: identified, versioned records.
//!
//! Each row holds one serialized [`Document`]. Saving an identifier that
//! already exists moves its current content onto `history` and writes the
//! record back in place, so `history` only ever grows by one per save and the
//! row keeps its rowid (the key of its index row).

use super::connection::{self, StoreTarget};
use super::schema::Schema;
use super::search::IndexMatch;
use crate::error::{LogbookError, Result};
use crate::model::{Content, Document};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use tracing::{debug, info};

// Qualified so the same fragments work when joined with document_index,
// which also has `text` and `tags` columns.
const SELECT_DOCUMENT: &str = "SELECT document.document FROM document";
const ORDER_NEWEST_FIRST: &str = "ORDER BY document.created DESC, document.rowid DESC";

pub struct DocumentStore {
    conn: Connection,
}

impl DocumentStore {
    pub fn open(target: &StoreTarget) -> Result<Self> {
        let conn = connection::open(target, Schema::Documents)?;
        Ok(Self { conn })
    }

    pub fn memory() -> Result<Self> {
        Self::open(&StoreTarget::Memory)
    }

    /// Creates `identifier` with `content`, or revises it if it exists.
    ///
    /// Never fails because the identifier is taken: a repeated save is an
    /// update that appends the previous content to history.
    pub fn save(&mut self, identifier: &str, content: Content) -> Result<()> {
        let tx = self.conn.transaction()?;

        match fetch(&tx, identifier)? {
            None => {
                let doc = Document {
                    identifier: identifier.to_string(),
                    content,
                    history: Vec::new(),
                };
                tx.execute(
                    "INSERT INTO document (document) VALUES (?1)",
                    params![doc.serialize()?],
                )?;
                info!(identifier, "Document created");
            }
            Some(mut doc) => {
                doc.revise(content);
                tx.execute(
                    "UPDATE document SET document = ?1 WHERE identifier = ?2",
                    params![doc.serialize()?, identifier],
                )?;
                info!(identifier, versions = doc.history.len(), "Document revised");
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Removes `identifier` and its history. Missing identifiers are not an
    /// error.
    pub fn delete(&mut self, identifier: &str) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM document WHERE identifier = ?1",
            params![identifier],
        )?;
        debug!(identifier, changed, "Document deleted");
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Result<Document> {
        fetch(&self.conn, identifier)?
            .ok_or_else(|| LogbookError::NotFound(format!("document {}", identifier)))
    }

    /// All documents, newest first.
    pub fn list(&self) -> Result<Vec<Document>> {
        let sql = format!("{} {}", SELECT_DOCUMENT, ORDER_NEWEST_FIRST);
        select(&self.conn, &sql, &[]).map_err(SelectError::into_storage)
    }

    pub fn list_by_content_type(&self, content_type: &str) -> Result<Vec<Document>> {
        let sql = format!(
            "{} WHERE document.contentType = ?1 {}",
            SELECT_DOCUMENT, ORDER_NEWEST_FIRST
        );
        select(&self.conn, &sql, &[&content_type])
            .map_err(|e| e.into_query("failed to filter by content type"))
    }

    /// Documents whose tags cover every token of `tag` by prefix.
    ///
    /// `tag` is split into word tokens and each token must start some word of
    /// some tag on the document; the tokens may hit different tags. So
    /// `"foo bar"` matches tags `["foo", "bar"]` and `["foo bar"]`, but not
    /// `["foobar"]` or `["foo"]`. A tag with no tokens matches nothing.
    pub fn list_by_tag(&self, tag: &str) -> Result<Vec<Document>> {
        self.matching("tags", tag)
    }

    /// Documents whose current text has a word starting with each token of
    /// `query`.
    pub fn search(&self, query: &str) -> Result<Vec<Document>> {
        self.matching("text", query)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM document", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// A fresh numeric identifier: the current time in milliseconds, bumped
    /// past the largest numeric identifier already stored.
    ///
    /// Digit-only identifiers beyond `i64` read back as `i64::MAX` (SQLite
    /// saturates the cast), which leaves no room above them; that is a
    /// storage error rather than a wrapped or reused id.
    pub fn next_numeric_identifier(&self) -> Result<i64> {
        let largest: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(CAST(identifier AS INTEGER)), 0) FROM document
             WHERE identifier != '' AND identifier NOT GLOB '*[^0-9]*'",
            [],
            |row| row.get(0),
        )?;
        let next = largest.checked_add(1).ok_or_else(|| {
            LogbookError::Storage("numeric identifiers exhausted".to_string())
        })?;
        Ok(Utc::now().timestamp_millis().max(next))
    }

    fn matching(&self, column: &str, term: &str) -> Result<Vec<Document>> {
        let Some(m) = IndexMatch::prepare(Schema::Documents.index_table(), column, term) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{} {} {}",
            SELECT_DOCUMENT,
            m.join("document.rowid"),
            ORDER_NEWEST_FIRST
        );
        let docs = select(&self.conn, &sql, &[&m.expression()])
            .map_err(|e| e.into_query("failed to get matched documents"))?;
        debug!(column, hits = docs.len(), "Document match");
        Ok(docs)
    }

    #[cfg(test)]
    fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn fetch(conn: &Connection, identifier: &str) -> Result<Option<Document>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT document FROM document WHERE identifier = ?1",
            params![identifier],
            |row| row.get(0),
        )
        .optional()?;
    raw.map(|raw| Document::decode(&raw)).transpose()
}

/// Separates substrate failures (which the caller classifies) from decode
/// failures (which stay decode failures).
enum SelectError {
    Sqlite(rusqlite::Error),
    Other(LogbookError),
}

impl SelectError {
    fn into_storage(self) -> LogbookError {
        match self {
            SelectError::Sqlite(e) => LogbookError::Sqlite(e),
            SelectError::Other(e) => e,
        }
    }

    fn into_query(self, context: &str) -> LogbookError {
        match self {
            SelectError::Sqlite(e) => LogbookError::query_failure(context, e),
            SelectError::Other(e) => e,
        }
    }
}

fn select(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> std::result::Result<Vec<Document>, SelectError> {
    let mut stmt = conn.prepare(sql).map_err(SelectError::Sqlite)?;
    let raws = stmt
        .query_map(params, |row| row.get::<_, String>(0))
        .map_err(SelectError::Sqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(SelectError::Sqlite)?;
    Document::decode_all(&raws).map_err(SelectError::Other)
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct DocumentFixture {
        pub store: DocumentStore,
    }

    impl DocumentFixture {
        pub fn new() -> Self {
            Self {
                store: DocumentStore::memory().unwrap(),
            }
        }

        pub fn with_post(mut self, identifier: &str, text: &str, tags: &[&str]) -> Self {
            let content = Content::new(text)
                .with_content_type("post")
                .with_tags(tags.iter().copied());
            self.store.save(identifier, content).unwrap();
            self
        }

        pub fn with_typed(mut self, identifier: &str, text: &str, content_type: &str) -> Self {
            let content = Content::new(text).with_content_type(content_type);
            self.store.save(identifier, content).unwrap();
            self
        }
    }

    impl Default for DocumentFixture {
        fn default() -> Self {
            Self::new()
        }
    }
}
