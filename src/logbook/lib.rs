//! # Logbook Architecture
//!
//! Logbook is an **embeddable content store** for a notes/journal application.
//! Clients treat it as an opaque engine: they ask for the current records,
//! create, update, delete or search, and always get back one serialized
//! envelope. The bundled CLI is just one such client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, prints envelopes, owns exit codes      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves a backend by name through the Registry          │
//! │  - Folds every outcome into envelope bytes                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One operation per module, written against `Backend`      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/, backend/)                           │
//! │  - EntryStore and DocumentStore on SQLite                   │
//! │  - FTS5 indexes kept in sync by triggers                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout/stderr or exits the process.
//! Diagnostics go through `tracing`; whether they are shown is up to the
//! subscriber the host installs.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for envelope-speaking clients
//! - [`backend`]: The `Backend` contract and the name registry
//! - [`commands`]: One module per operation
//! - [`store`]: SQLite strategies, schema, search index
//! - [`model`]: `Entry`, `Document`, `Content`, `Meta`
//! - [`envelope`]: Response envelope and error body
//! - [`config`]: Configuration file
//! - [`error`]: Error types and codes

pub mod api;
pub mod backend;
pub mod commands;
pub mod config;
pub mod envelope;
pub mod error;
pub mod model;
pub mod store;
