//! Store backend that only logs what would have been written

use super::{StoreCounts, StoreError, TranslationStore};
use crate::types::{TranslationEdge, Word};
use std::collections::HashMap;
use tracing::{debug, info};

/// How many rows of each batch to echo at debug level
const SAMPLE_ROWS: usize = 5;

/// Dry-run backend.
///
/// Lookups never find anything, so every word stays provisional and the
/// pipeline runs exactly as it would against an empty database.
#[derive(Debug, Default)]
pub struct DryRunStore {
    word_batches: usize,
    edge_batches: usize,
    words_seen: usize,
    edges_seen: usize,
}

impl DryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Words that would have been inserted
    pub fn words_seen(&self) -> usize {
        self.words_seen
    }

    /// Edges that would have been inserted
    pub fn edges_seen(&self) -> usize {
        self.edges_seen
    }

    /// Batches of (words, edges) that would have been issued
    pub fn batches(&self) -> (usize, usize) {
        (self.word_batches, self.edge_batches)
    }
}

impl TranslationStore for DryRunStore {
    fn find_words(&mut self, _words: &[Word]) -> Result<HashMap<Word, i64>, StoreError> {
        Ok(HashMap::new())
    }

    fn insert_words(&mut self, words: &[Word]) -> Result<usize, StoreError> {
        if words.is_empty() {
            return Ok(0);
        }
        self.word_batches += 1;
        self.words_seen += words.len();
        info!(
            "DRY RUN: would insert batch #{} of {} words",
            self.word_batches,
            words.len()
        );
        for word in words.iter().take(SAMPLE_ROWS) {
            debug!("DRY RUN:   word {}", word);
        }
        Ok(0)
    }

    fn insert_edges(&mut self, edges: &[TranslationEdge]) -> Result<usize, StoreError> {
        if edges.is_empty() {
            return Ok(0);
        }
        self.edge_batches += 1;
        self.edges_seen += edges.len();
        info!(
            "DRY RUN: would insert batch #{} of {} translations",
            self.edge_batches,
            edges.len()
        );
        for edge in edges.iter().take(SAMPLE_ROWS) {
            debug!("DRY RUN:   translation {} -> {}", edge.source, edge.target);
        }
        Ok(0)
    }

    fn counts(&mut self) -> Result<StoreCounts, StoreError> {
        Ok(StoreCounts::default())
    }

    fn describe(&self) -> String {
        "dry-run".to_string()
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
