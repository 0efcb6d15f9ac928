//! # Commands
//!
//! One module per public operation. Each `run` takes the resolved backend,
//! performs the mutation (if any) and answers with the backend's full listing
//! afterwards, which is what the envelope carries back to clients.

pub mod create;
pub mod delete;
pub mod list;
pub mod search;
pub mod update;
