//! Explicit runtime configuration for the persistence layer.

use std::path::{Path, PathBuf};

/// Database file used when no path is configured.
pub const DEFAULT_DB_FILE: &str = "notepad.sqlite";

/// Location of the SQLite store, threaded into the gateway at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE)
    }
}
