//! Persistence for words and translation edges
//!
//! The import pipeline talks to storage only through [`TranslationStore`].
//! [`WordRegistry`] and [`EdgeWriter`] stage rows and hand them to the store
//! in batches; the store decides what "writing" means.
//!
//! ```text
//!   WordRegistry ──┐                  ┌── SqliteStore  (words / translations tables)
//!                  ├─ TranslationStore┤
//!   EdgeWriter ────┘                  └── DryRunStore  (logs batches, writes nothing)
//! ```
//!
//! Both backends implement insert-or-ignore semantics keyed on the unique
//! columns, so re-running an import never creates duplicate rows.

pub mod dry_run;
pub mod edges;
pub mod registry;
pub mod sqlite;

pub use dry_run::DryRunStore;
pub use edges::EdgeWriter;
pub use registry::{FlushReport, WordRegistry};
pub use sqlite::SqliteStore;

use crate::config::StoreConfig;
use crate::types::{TranslationEdge, Word};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors raised by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Edge {0} -> {1} references a word that was never persisted")]
    UnresolvedWord(String, String),

    #[error("Batch of {rows} {table} rows failed: {source}")]
    BatchWrite {
        table: &'static str,
        rows: usize,
        #[source]
        source: rusqlite::Error,
    },
}

/// Row counts in a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    /// Word rows per language code
    pub words_by_lang: BTreeMap<String, u64>,
    /// Translation rows
    pub translations: u64,
}

impl StoreCounts {
    pub fn total_words(&self) -> u64 {
        self.words_by_lang.values().sum()
    }
}

/// Storage backend for the import pipeline
pub trait TranslationStore {
    /// Look up row ids for `words`. Words with no row are absent from the map.
    fn find_words(&mut self, words: &[Word]) -> Result<HashMap<Word, i64>, StoreError>;

    /// Insert `words` as one batch, silently skipping ones that already exist.
    /// Returns the number of rows actually inserted.
    fn insert_words(&mut self, words: &[Word]) -> Result<usize, StoreError>;

    /// Insert `edges` as one batch, silently skipping existing pairs.
    /// Returns the number of rows actually inserted.
    fn insert_edges(&mut self, edges: &[TranslationEdge]) -> Result<usize, StoreError>;

    /// Current row counts
    fn counts(&mut self) -> Result<StoreCounts, StoreError>;

    /// Human-readable backend description
    fn describe(&self) -> String;

    /// Whether this backend discards all writes
    fn is_dry_run(&self) -> bool {
        false
    }

    /// Row id of a single word
    fn find_word(&mut self, word: &Word) -> Result<Option<i64>, StoreError> {
        let found = self.find_words(std::slice::from_ref(word))?;
        Ok(found.get(word).copied())
    }
}

/// Open the backend selected by configuration
pub fn open_store(
    config: &StoreConfig,
    dry_run: bool,
) -> Result<Box<dyn TranslationStore>, StoreError> {
    if dry_run {
        Ok(Box::new(DryRunStore::new()))
    } else {
        Ok(Box::new(SqliteStore::open(config)?))
    }
}
