use super::Backend;
use crate::error::{LogbookError, Result};
use crate::store::{DocumentStore, EntryStore, StoreTarget};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const ENTRY_BACKEND: &str = "entries";
pub const DOCUMENT_BACKEND: &str = "documents";

/// Builds a backend for a store target.
pub type BackendFactory = Box<dyn Fn(&StoreTarget) -> Result<Box<dyn Backend>>>;

/// Name-keyed backend factories.
///
/// A registry is an ordinary value: build one at startup, register what the
/// application supports and hand it to whoever opens stores. Registering a
/// name again replaces the earlier factory.
#[derive(Default)]
pub struct Registry {
    factories: HashMap<String, BackendFactory>,
}

impl Registry {
    /// An empty registry; nothing resolves until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with both built-in strategies under
    /// [`ENTRY_BACKEND`] and [`DOCUMENT_BACKEND`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ENTRY_BACKEND, |target: &StoreTarget| {
            Ok(Box::new(EntryStore::open(target)?) as Box<dyn Backend>)
        });
        registry.register(DOCUMENT_BACKEND, |target: &StoreTarget| {
            Ok(Box::new(DocumentStore::open(target)?) as Box<dyn Backend>)
        });
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&StoreTarget) -> Result<Box<dyn Backend>> + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            debug!(backend = %name, "Backend registration replaced");
        }
    }

    /// Instantiates the backend registered as `name` against `target`.
    ///
    /// An unknown name is a configuration error; there is no fallback.
    pub fn resolve(&self, name: &str, target: &StoreTarget) -> Result<Box<dyn Backend>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            warn!(backend = name, "Backend not registered");
            LogbookError::Configuration(format!("backend '{}' not registered", name))
        })?;
        debug!(backend = name, store = %target, "Resolving backend");
        factory(target)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
