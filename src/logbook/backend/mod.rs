//! # Backends
//!
//! A backend is a storage strategy seen through the one contract every
//! client speaks: list the current records, create/update/delete an entry by
//! numeric id, and search. Two strategies implement it:
//!
//! - [`EntryStore`]: flat entries with auto-assigned ids.
//! - [`DocumentStore`]: versioned documents; entry operations are mapped onto
//!   document saves, so every update also grows the document's history.
//!
//! Which one a client gets is decided by name through a [`Registry`], never
//! by the client constructing a store itself.

use crate::envelope::{Listing, ListingKind};
use crate::error::Result;
use crate::model::Content;
use crate::store::{DocumentStore, EntryStore};
use tracing::debug;

pub mod registry;

pub use registry::{BackendFactory, Registry, DOCUMENT_BACKEND, ENTRY_BACKEND};

/// The uniform store contract.
pub trait Backend {
    /// Name of the list key this backend answers with.
    fn kind(&self) -> ListingKind;

    /// Every record, newest first.
    fn current(&self) -> Result<Listing>;

    fn create_entry(&mut self, text: &str, color: i64) -> Result<()>;

    fn update_entry(&mut self, id: i64, text: &str, color: i64) -> Result<()>;

    fn delete_entry(&mut self, id: i64) -> Result<()>;

    /// Records matching `query` by word prefix, newest first.
    fn search(&self, query: &str) -> Result<Listing>;
}

impl Backend for EntryStore {
    fn kind(&self) -> ListingKind {
        ListingKind::Entries
    }

    fn current(&self) -> Result<Listing> {
        Ok(Listing::entries(self.list()?))
    }

    fn create_entry(&mut self, text: &str, color: i64) -> Result<()> {
        self.create(text, color).map(|_| ())
    }

    fn update_entry(&mut self, id: i64, text: &str, color: i64) -> Result<()> {
        self.update(id, text, color)
    }

    fn delete_entry(&mut self, id: i64) -> Result<()> {
        self.delete(id)
    }

    fn search(&self, query: &str) -> Result<Listing> {
        Ok(Listing::entries(EntryStore::search(self, query)?))
    }
}

impl Backend for DocumentStore {
    fn kind(&self) -> ListingKind {
        ListingKind::Documents
    }

    fn current(&self) -> Result<Listing> {
        Ok(Listing::documents(self.list()?))
    }

    fn create_entry(&mut self, text: &str, color: i64) -> Result<()> {
        let identifier = self.next_numeric_identifier()?.to_string();
        debug!(identifier = %identifier, "Creating document for entry");
        self.save(&identifier, Content::new(text).with_color(color))
    }

    /// Loads the document for `id`, so an unknown id is `NotFound` here.
    fn update_entry(&mut self, id: i64, text: &str, color: i64) -> Result<()> {
        let doc = self.get(&id.to_string())?;
        let mut content = doc.content;
        content.text = text.to_string();
        content.meta.color = color;
        content.modified = chrono::Utc::now();
        self.save(&doc.identifier, content)
    }

    fn delete_entry(&mut self, id: i64) -> Result<()> {
        self.delete(&id.to_string())
    }

    fn search(&self, query: &str) -> Result<Listing> {
        Ok(Listing::documents(DocumentStore::search(self, query)?))
    }
}
