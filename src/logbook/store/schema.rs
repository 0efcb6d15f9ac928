//! Schema bootstrap for both storage strategies.
//!
//! Each primary table has an FTS5 shadow index kept in lockstep by triggers:
//!
//! | primary mutation | index effect |
//! |------------------|--------------|
//! | `INSERT`         | one index row with the same rowid |
//! | `UPDATE` of the indexed source | index row rewritten in place |
//! | `DELETE`         | index row removed |
//!
//! The document table stores the serialized [`crate::model::Document`] in a
//! single `document` column; every other column is generated from it with
//! `json_extract` so filters and the index never drift from the payload.
//! The index gets the tag values themselves, space-joined, not the JSON array
//! text, so escapes inside a tag never become tokens.
//! Saves of an existing identifier are done with `UPDATE`, never
//! `INSERT OR REPLACE`, so a document's rowid (the index key) is stable for
//! its whole life.

use crate::error::{LogbookError, Result};
use rusqlite::Connection;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Entries,
    Documents,
}

impl Schema {
    /// Primary table name.
    pub fn table(self) -> &'static str {
        match self {
            Schema::Entries => "entry",
            Schema::Documents => "document",
        }
    }

    /// FTS5 index table name.
    pub fn index_table(self) -> &'static str {
        match self {
            Schema::Entries => "entry_index",
            Schema::Documents => "document_index",
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Schema::Entries => ENTRY_SCHEMA,
            Schema::Documents => DOCUMENT_SCHEMA,
        }
    }
}

/// Creates tables, indexes and triggers that don't exist yet.
pub fn apply(conn: &Connection, schema: Schema) -> Result<()> {
    debug!(table = schema.table(), "Applying schema");
    conn.execute_batch(schema.sql()).map_err(|e| {
        LogbookError::Storage(format!(
            "failed to initialize {} schema: {}",
            schema.table(),
            e
        ))
    })
}

const ENTRY_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entry (
    id       INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    text     TEXT NOT NULL,
    color    INTEGER NOT NULL,
    created  INTEGER NOT NULL,
    modified INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entry_created ON entry(created);

CREATE VIRTUAL TABLE IF NOT EXISTS entry_index USING fts5(text, tokenize = 'porter unicode61');

CREATE TRIGGER IF NOT EXISTS after_entry_insert AFTER INSERT ON entry BEGIN
    INSERT INTO entry_index (rowid, text) VALUES (new.id, new.text);
END;

CREATE TRIGGER IF NOT EXISTS after_entry_update AFTER UPDATE OF text ON entry BEGIN
    UPDATE entry_index SET text = new.text WHERE rowid = old.id;
END;

CREATE TRIGGER IF NOT EXISTS after_entry_delete AFTER DELETE ON entry BEGIN
    DELETE FROM entry_index WHERE rowid = old.id;
END;
"#;

const DOCUMENT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS document (
    document    TEXT NOT NULL,
    identifier  TEXT GENERATED ALWAYS AS (json_extract(document, '$.identifier')) VIRTUAL NOT NULL UNIQUE,
    contentType TEXT GENERATED ALWAYS AS (json_extract(document, '$.content.meta.contentType')) VIRTUAL NOT NULL,
    text        TEXT GENERATED ALWAYS AS (json_extract(document, '$.content.text')) VIRTUAL NOT NULL,
    tags        TEXT GENERATED ALWAYS AS (json_extract(document, '$.content.meta.tags')) VIRTUAL,
    created     TEXT GENERATED ALWAYS AS (json_extract(document, '$.content.created')) VIRTUAL NOT NULL,
    modified    TEXT GENERATED ALWAYS AS (json_extract(document, '$.content.modified')) VIRTUAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_document_content_type ON document(contentType);
CREATE INDEX IF NOT EXISTS idx_document_created ON document(created);

CREATE VIRTUAL TABLE IF NOT EXISTS document_index USING fts5(text, tags);

CREATE TRIGGER IF NOT EXISTS after_document_insert AFTER INSERT ON document BEGIN
    INSERT INTO document_index (rowid, text, tags) VALUES (
        new.rowid,
        new.text,
        (SELECT group_concat(value, ' ') FROM json_each(new.document, '$.content.meta.tags'))
    );
END;

CREATE TRIGGER IF NOT EXISTS after_document_update AFTER UPDATE OF document ON document BEGIN
    UPDATE document_index SET
        text = new.text,
        tags = (SELECT group_concat(value, ' ') FROM json_each(new.document, '$.content.meta.tags'))
    WHERE rowid = old.rowid;
END;

CREATE TRIGGER IF NOT EXISTS after_document_delete AFTER DELETE ON document BEGIN
    DELETE FROM document_index WHERE rowid = old.rowid;
END;
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn names(conn: &Connection, kind: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = ?1 ORDER BY name")
            .unwrap();
        let rows = stmt.query_map([kind], |row| row.get(0)).unwrap();
        rows.filter_map(std::result::Result::ok).collect()
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        for schema in [Schema::Entries, Schema::Documents] {
            apply(&conn, schema).unwrap();
            apply(&conn, schema).unwrap();
        }

        let tables = names(&conn, "table");
        assert!(tables.contains(&"entry".to_string()));
        assert!(tables.contains(&"entry_index".to_string()));
        assert!(tables.contains(&"document".to_string()));
        assert!(tables.contains(&"document_index".to_string()));
    }

    #[test]
    fn creates_all_three_triggers_per_table() {
        let conn = Connection::open_in_memory().unwrap();
        apply(&conn, Schema::Entries).unwrap();
        apply(&conn, Schema::Documents).unwrap();

        assert_eq!(
            names(&conn, "trigger"),
            vec![
                "after_document_delete",
                "after_document_insert",
                "after_document_update",
                "after_entry_delete",
                "after_entry_insert",
                "after_entry_update",
            ]
        );
    }

    #[test]
    fn entry_triggers_keep_index_in_lockstep() {
        let conn = Connection::open_in_memory().unwrap();
        apply(&conn, Schema::Entries).unwrap();

        conn.execute(
            "INSERT INTO entry (text, color, created, modified) VALUES ('alpha', 0, 1, 1)",
            [],
        )
        .unwrap();
        let indexed: String = conn
            .query_row("SELECT text FROM entry_index WHERE rowid = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(indexed, "alpha");

        conn.execute("UPDATE entry SET text = 'beta' WHERE id = 1", [])
            .unwrap();
        let indexed: String = conn
            .query_row("SELECT text FROM entry_index WHERE rowid = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(indexed, "beta");

        conn.execute("DELETE FROM entry WHERE id = 1", []).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entry_index", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn document_columns_are_derived_from_payload() {
        let conn = Connection::open_in_memory().unwrap();
        apply(&conn, Schema::Documents).unwrap();

        conn.execute(
            "INSERT INTO document (document) VALUES (?1)",
            [r#"{"identifier":"d1","content":{"text":"hello","created":"2024-01-01T00:00:00.000000000Z","modified":"2024-01-01T00:00:00.000000000Z","meta":{"contentType":"post","tags":["x","y"],"color":0}},"history":[]}"#],
        )
        .unwrap();

        let (identifier, content_type, tags): (String, String, String) = conn
            .query_row(
                "SELECT identifier, contentType, tags FROM document",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(identifier, "d1");
        assert_eq!(content_type, "post");
        assert_eq!(tags, r#"["x","y"]"#);

        let indexed: String = conn
            .query_row("SELECT tags FROM document_index", [], |r| r.get(0))
            .unwrap();
        assert_eq!(indexed, "x y");

        conn.execute(
            "UPDATE document SET document = json_set(document, '$.content.meta.tags', json_array('z\n1')) WHERE identifier = 'd1'",
            [],
        )
        .unwrap();
        let indexed: String = conn
            .query_row("SELECT tags FROM document_index", [], |r| r.get(0))
            .unwrap();
        assert_eq!(indexed, "z\n1");
    }
}
