//! Relational store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SQLite store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file (created if missing)
    pub database: PathBuf,
    /// How long a statement waits on a locked database (milliseconds)
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("dictdb.sqlite3"),
            busy_timeout_ms: 5000,
        }
    }
}
