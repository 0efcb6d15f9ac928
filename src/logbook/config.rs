use crate::backend::ENTRY_BACKEND;
use crate::error::{LogbookError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATABASE: &str = "logbook.db";

/// Configuration for logbook, stored as config.json in the data directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogbookConfig {
    /// Registered backend name used when none is given on the command line
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Database file, relative paths resolve against the data directory
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_backend() -> String {
    ENTRY_BACKEND.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database: default_database(),
        }
    }
}

impl LogbookConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: LogbookConfig = serde_json::from_str(&content).map_err(|e| {
            LogbookError::Configuration(format!("{}: {}", config_path.display(), e))
        })?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Path of the database file for a given data directory.
    pub fn database_path<P: AsRef<Path>>(&self, data_dir: P) -> PathBuf {
        let database = Path::new(&self.database);
        if database.is_absolute() {
            database.to_path_buf()
        } else {
            data_dir.as_ref().join(database)
        }
    }
}
