//! Error types shared by every layer.
//!
//! Each variant maps onto one envelope code through [`LogbookError::code`];
//! the three storage-flavoured variants all report `StorageFailure`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogbookError {
    /// Lookup by identifier matched no row.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reserved; saves are upserts, so nothing raises it today.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A search or filter could not run. Zero matches is not this.
    #[error("Query error: {0}")]
    Query(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Bad setup, e.g. an unregistered backend name.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LogbookError {
    /// Stable code carried in the envelope's `error.code` field.
    pub fn code(&self) -> &'static str {
        match self {
            LogbookError::NotFound(_) => "NotFound",
            LogbookError::Conflict(_) => "Conflict",
            LogbookError::Storage(_) | LogbookError::Sqlite(_) | LogbookError::Io(_) => {
                "StorageFailure"
            }
            LogbookError::Query(_) => "QueryFailure",
            LogbookError::Decode(_) => "DecodeFailure",
            LogbookError::Configuration(_) => "ConfigurationFailure",
        }
    }

    /// Wraps a substrate error raised while running a search or filter query.
    pub fn query_failure(context: &str, err: rusqlite::Error) -> Self {
        LogbookError::Query(format!("{}: {}", context, err))
    }
}

pub type Result<T> = std::result::Result<T, LogbookError>;
