//! Import pipeline configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of rows per insert batch
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Upper bound on rows per insert batch
pub const MAX_BATCH_SIZE: usize = 10_000;

/// The three languages taking part in a one-hop bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeLanguages {
    /// Language shared by both sides (English)
    pub bridge: String,
    /// Language linked from (German)
    pub source: String,
    /// Language linked to (Persian)
    pub target: String,
}

impl Default for BridgeLanguages {
    fn default() -> Self {
        Self {
            bridge: "en".to_string(),
            source: "de".to_string(),
            target: "fa".to_string(),
        }
    }
}

impl BridgeLanguages {
    pub fn new(
        bridge: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            bridge: bridge.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Import configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Default dump path when none is given on the command line
    pub input: PathBuf,
    /// Rows per insert statement batch (words and translations)
    pub batch_size: usize,
    /// Compute everything but never mutate the store
    pub dry_run: bool,
    /// Also record target -> source for every bridged pair
    pub symmetric: bool,
    /// Lowercase word text during extraction
    pub lowercase_words: bool,
    /// Stop after this many records (None = whole dump)
    pub max_records: Option<usize>,
    /// Write one line per skipped record to this file
    pub error_log: Option<PathBuf>,
    /// Languages to bridge
    pub languages: BridgeLanguages,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/raw-wiktextract-data.jsonl"),
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            symmetric: true,
            lowercase_words: false,
            max_records: None,
            error_log: None,
            languages: BridgeLanguages::default(),
        }
    }
}
