//! # Storage Layer
//!
//! Both storage strategies sit on SQLite. Each store owns exactly one
//! connection, opened by [`connection::open`] at construction and closed when
//! the store is dropped; operations are plain blocking calls on it.
//!
//! ## Implementations
//!
//! - [`entries::EntryStore`]: the flat `entry` table.
//! - [`documents::DocumentStore`]: the `document` table, one serialized
//!   [`crate::model::Document`] per row plus generated columns.
//!
//! ## Search Index
//!
//! Each table has an FTS5 index that SQLite triggers keep in step with it
//! (see [`schema`]). Nothing in the write path touches the index directly;
//! [`search`] only reads it.
//!
//! ## Storage Layout
//!
//! ```text
//! entry           (id, text, color, created, modified)
//! entry_index     FTS5(text)               rowid = entry.id
//! document        (document, identifier*, contentType*, text*, tags*, created*, modified*)
//! document_index  FTS5(text, tags)         rowid = document.rowid
//!                                          (* generated from the document JSON)
//! ```
//!
//! ## Ordering
//!
//! Every listing is newest first by `created`, ties broken by insertion order
//! (most recent insert first).

pub mod connection;
pub mod documents;
pub mod entries;
pub mod schema;
pub mod search;

pub use connection::StoreTarget;
pub use documents::DocumentStore;
pub use entries::EntryStore;
