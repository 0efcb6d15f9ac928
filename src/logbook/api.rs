//! # API Facade
//!
//! The single entry point for clients that treat logbook as an opaque store.
//! `LogbookApi` owns one resolved [`Backend`], dispatches each call to the
//! matching command and hands back the serialized [`Envelope`].
//!
//! Every method returns bytes, never a `Result`: failures are folded into the
//! envelope's `error` member and the list key is rendered as `null`. Callers
//! must inspect `error` on every response.
//!
//! Storage-specific document operations (`save`, `get`, `list_by_tag`, ...)
//! are not part of this surface; use [`crate::store::DocumentStore`] directly.
//!
//! ## Testing Strategy
//!
//! API tests check dispatch and envelope shape. Command logic is tested in
//! `commands/*.rs`, storage behaviour in `store/`.

use crate::backend::{Backend, Registry};
use crate::commands;
use crate::envelope::{Envelope, Listing, ListingKind};
use crate::error::Result;
use crate::store::StoreTarget;
use tracing::warn;

pub struct LogbookApi {
    backend: Box<dyn Backend>,
}

impl LogbookApi {
    /// Resolves `kind` in `registry` against `target`.
    pub fn open(registry: &Registry, kind: &str, target: &StoreTarget) -> Result<Self> {
        let backend = registry.resolve(kind, target)?;
        Ok(Self::from_backend(backend))
    }

    pub fn from_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn kind(&self) -> ListingKind {
        self.backend.kind()
    }

    pub fn current(&self) -> Vec<u8> {
        self.respond("current", commands::list::run(self.backend.as_ref()))
    }

    pub fn create(&mut self, text: &str, color: i64) -> Vec<u8> {
        let result = commands::create::run(self.backend.as_mut(), text, color);
        self.respond("create", result)
    }

    pub fn update(&mut self, id: i64, text: &str, color: i64) -> Vec<u8> {
        let result = commands::update::run(self.backend.as_mut(), id, text, color);
        self.respond("update", result)
    }

    pub fn delete(&mut self, id: i64) -> Vec<u8> {
        let result = commands::delete::run(self.backend.as_mut(), id);
        self.respond("delete", result)
    }

    pub fn search(&self, query: &str) -> Vec<u8> {
        self.respond("search", commands::search::run(self.backend.as_ref(), query))
    }

    fn respond(&self, operation: &str, result: Result<Listing>) -> Vec<u8> {
        if let Err(err) = &result {
            warn!(operation, code = err.code(), error = %err, "Operation failed");
        }
        Envelope::from_result(self.kind(), result).encode()
    }
}
