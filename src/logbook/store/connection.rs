//! Opening the single SQLite handle a store owns for its lifetime.

use super::schema::{self, Schema};
use crate::error::{LogbookError, Result};
use rusqlite::Connection;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

const MEMORY_TARGET: &str = ":memory:";
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Where a store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// Non-persistent, private to the handle. Used by tests.
    Memory,
    File(PathBuf),
}

impl StoreTarget {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        StoreTarget::File(path.into())
    }
}

impl FromStr for StoreTarget {
    type Err = LogbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Err(LogbookError::Configuration(
                "store target cannot be empty".to_string(),
            )),
            MEMORY_TARGET => Ok(StoreTarget::Memory),
            path => Ok(StoreTarget::File(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for StoreTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreTarget::Memory => write!(f, "{}", MEMORY_TARGET),
            StoreTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Opens `target`, configures it and applies `schema`.
///
/// Schema application is idempotent, so this is safe to call against an
/// existing database on every start.
pub fn open(target: &StoreTarget, schema: Schema) -> Result<Connection> {
    info!(store = %target, ?schema, "Opening store");

    let conn = match target {
        StoreTarget::Memory => Connection::open_in_memory()?,
        StoreTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open(path)?
        }
    };

    configure_pragmas(&conn, target)?;
    schema::apply(&conn, schema)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection, target: &StoreTarget) -> Result<()> {
    debug!("Configuring SQLite pragmas");

    if matches!(target, StoreTarget::File(_)) {
        // journal_mode returns a row, so it can't go through execute_batch
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
        debug!(mode = %mode, "Journal mode set");
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    }

    conn.execute_batch(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
    conn.execute_batch("PRAGMA recursive_triggers = ON;")?;
    Ok(())
}
