//! The flat entry strategy: one row per [`Entry`], auto-assigned ids.

use super::connection::{self, StoreTarget};
use super::schema::Schema;
use super::search::IndexMatch;
use crate::error::{LogbookError, Result};
use crate::model::Entry;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

// Qualified so the same fragments work when joined with entry_index, which
// also has a `text` column.
const SELECT_ENTRY: &str =
    "SELECT entry.id, entry.text, entry.color, entry.created, entry.modified FROM entry";
const ORDER_NEWEST_FIRST: &str = "ORDER BY entry.created DESC, entry.id DESC";

pub struct EntryStore {
    conn: Connection,
}

impl EntryStore {
    pub fn open(target: &StoreTarget) -> Result<Self> {
        let conn = connection::open(target, Schema::Entries)?;
        Ok(Self { conn })
    }

    pub fn memory() -> Result<Self> {
        Self::open(&StoreTarget::Memory)
    }

    /// Inserts a new entry and returns it with its assigned id.
    pub fn create(&mut self, text: &str, color: i64) -> Result<Entry> {
        let mut entry = Entry::new(text, color);
        self.conn.execute(
            "INSERT INTO entry (text, color, created, modified) VALUES (?1, ?2, ?3, ?4)",
            params![entry.text, entry.color, entry.created, entry.modified],
        )?;
        entry.id = self.conn.last_insert_rowid();
        debug!(id = entry.id, "Entry created");
        Ok(entry)
    }

    /// Rewrites text and color of `id`. Updating an id that doesn't exist
    /// changes nothing.
    pub fn update(&mut self, id: i64, text: &str, color: i64) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE entry SET text = ?1, color = ?2, modified = ?3 WHERE id = ?4",
            params![text, color, Utc::now().timestamp(), id],
        )?;
        debug!(id, changed, "Entry updated");
        Ok(())
    }

    /// Removes `id` and its index row. Missing ids are not an error.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM entry WHERE id = ?1", params![id])?;
        debug!(id, changed, "Entry deleted");
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Entry> {
        self.conn
            .query_row(&format!("{} WHERE entry.id = ?1", SELECT_ENTRY), params![id], from_row)
            .optional()?
            .ok_or_else(|| LogbookError::NotFound(format!("entry {}", id)))
    }

    /// All entries, newest first.
    pub fn list(&self) -> Result<Vec<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} {}", SELECT_ENTRY, ORDER_NEWEST_FIRST))?;
        let entries = stmt
            .query_map([], from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Entries whose text has a word starting with each token of `query`,
    /// newest first.
    pub fn search(&self, query: &str) -> Result<Vec<Entry>> {
        let Some(m) = IndexMatch::prepare(Schema::Entries.index_table(), "text", query) else {
            return Ok(Vec::new());
        };

        let sql = format!("{} {} {}", SELECT_ENTRY, m.join("entry.id"), ORDER_NEWEST_FIRST);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| LogbookError::query_failure("failed to prepare entry search", e))?;
        let entries = stmt
            .query_map([m.expression()], from_row)
            .map_err(|e| LogbookError::query_failure("failed to search entries", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| LogbookError::query_failure("failed to read matched entries", e))?;
        debug!(hits = entries.len(), "Entry search");
        Ok(entries)
    }

    #[cfg(test)]
    fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        text: row.get(1)?,
        color: row.get(2)?,
        created: row.get(3)?,
        modified: row.get(4)?,
    })
}
