//! Word registry: deduplicates `(text, lang)` pairs into stable ids
//!
//! Lookups go to the in-memory cache first, then to the store. Unknown words
//! are staged and receive a provisional id straight away; `flush` writes the
//! staged words with insert-or-ignore, reads their row ids back and promotes
//! the provisional ids.

use super::{StoreError, TranslationStore};
use crate::types::{Word, WordId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Outcome of a registry flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Insert batches issued
    pub batches: usize,
    /// Rows actually inserted (existing rows are ignored by the store)
    pub inserted: usize,
    /// Provisional ids that now have a row id
    pub promoted: usize,
    /// Staged words the store returned no id for (always the case in a dry run)
    pub unresolved: usize,
}

/// Registry of every word seen during a run
pub struct WordRegistry {
    cache: HashMap<Word, WordId>,
    /// Words awaiting insert, with their provisional id
    staged: Vec<(Word, u64)>,
    /// Provisional id -> row id, for ids handed out before a flush
    promoted: HashMap<u64, i64>,
    next_provisional: u64,
    batch_size: usize,
}

impl WordRegistry {
    pub fn new(batch_size: usize) -> Self {
        Self {
            cache: HashMap::new(),
            staged: Vec::new(),
            promoted: HashMap::new(),
            next_provisional: 0,
            batch_size: batch_size.max(1),
        }
    }

    /// Id for `word`, staging it for insert if neither cache nor store know it
    pub fn resolve(
        &mut self,
        store: &mut dyn TranslationStore,
        word: &Word,
    ) -> Result<WordId, StoreError> {
        if let Some(id) = self.cache.get(word) {
            return Ok(*id);
        }

        if let Some(row_id) = store.find_word(word)? {
            let id = WordId::Durable(row_id);
            self.cache.insert(word.clone(), id);
            return Ok(id);
        }

        Ok(self.stage(word))
    }

    /// Ids for `words`, in order, with a single store lookup covering every
    /// word not already cached
    pub fn resolve_all(
        &mut self,
        store: &mut dyn TranslationStore,
        words: &[&Word],
    ) -> Result<Vec<WordId>, StoreError> {
        let unknown: Vec<Word> = words
            .iter()
            .filter(|w| !self.cache.contains_key(**w))
            .map(|w| (*w).clone())
            .collect();
        let found = if unknown.is_empty() {
            HashMap::new()
        } else {
            store.find_words(&unknown)?
        };

        let mut ids = Vec::with_capacity(words.len());
        for &word in words {
            let id = match (self.cache.get(word), found.get(word)) {
                (Some(&id), _) => id,
                (None, Some(&row_id)) => {
                    let id = WordId::Durable(row_id);
                    self.cache.insert(word.clone(), id);
                    id
                }
                (None, None) => self.stage(word),
            };
            ids.push(id);
        }
        Ok(ids)
    }

    fn stage(&mut self, word: &Word) -> WordId {
        let provisional = self.next_provisional;
        self.next_provisional += 1;
        let id = WordId::Provisional(provisional);
        self.cache.insert(word.clone(), id);
        self.staged.push((word.clone(), provisional));
        id
    }

    /// Write every staged word, `batch_size` rows per insert.
    ///
    /// On failure the failing batch and everything after it stay staged and
    /// keep their provisional ids.
    pub fn flush(&mut self, store: &mut dyn TranslationStore) -> Result<FlushReport, StoreError> {
        let mut report = FlushReport::default();

        while !self.staged.is_empty() {
            let take = self.staged.len().min(self.batch_size);
            let words: Vec<Word> = self.staged[..take].iter().map(|(w, _)| w.clone()).collect();

            let inserted = store.insert_words(&words)?;
            let ids = store.find_words(&words)?;

            for (word, provisional) in self.staged.drain(..take) {
                match ids.get(&word) {
                    Some(&row_id) => {
                        self.promoted.insert(provisional, row_id);
                        self.cache.insert(word, WordId::Durable(row_id));
                        report.promoted += 1;
                    }
                    None => report.unresolved += 1,
                }
            }

            report.batches += 1;
            report.inserted += inserted;
        }

        if report.batches > 0 {
            debug!(
                "Flushed words: {} batches, {} inserted, {} promoted",
                report.batches, report.inserted, report.promoted
            );
        }
        if report.unresolved > 0 && !store.is_dry_run() {
            warn!(
                "{} staged words have no row id after insert",
                report.unresolved
            );
        }

        Ok(report)
    }

    /// The row id behind a previously issued provisional id, if it was flushed
    pub fn durable(&self, id: WordId) -> WordId {
        match id {
            WordId::Provisional(n) => self
                .promoted
                .get(&n)
                .map(|&row_id| WordId::Durable(row_id))
                .unwrap_or(id),
            durable => durable,
        }
    }

    /// Whether enough words are staged to fill a batch
    pub fn needs_flush(&self) -> bool {
        self.staged.len() >= self.batch_size
    }

    /// Number of staged words
    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    /// Number of distinct words known to the registry
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DryRunStore, SqliteStore};

    #[test]
    fn test_resolve_before_flush_is_stable() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut registry = WordRegistry::new(100);
        let hund = Word::new("Hund", "de");

        let first = registry.resolve(&mut store, &hund).unwrap();
        let second = registry.resolve(&mut store, &hund).unwrap();
        assert!(first.is_provisional());
        assert_eq!(first, second);
        assert_eq!(registry.staged(), 1);

        registry.flush(&mut store).unwrap();

        let row_id = store.find_word(&hund).unwrap().unwrap();
        assert_eq!(registry.durable(first), WordId::Durable(row_id));
        assert_eq!(registry.resolve(&mut store, &hund).unwrap(), WordId::Durable(row_id));
    }

    #[test]
    fn test_resolve_finds_existing_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert_words(&[Word::new("dog", "en")]).unwrap();
        let row_id = store.find_word(&Word::new("dog", "en")).unwrap().unwrap();

        let mut registry = WordRegistry::new(100);
        let id = registry.resolve(&mut store, &Word::new("dog", "en")).unwrap();
        assert_eq!(id, WordId::Durable(row_id));
        assert_eq!(registry.staged(), 0);
    }

    #[test]
    fn test_resolve_all_mixes_cached_existing_and_new() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert_words(&[Word::new("dog", "en")]).unwrap();
        let dog_row = store.find_word(&Word::new("dog", "en")).unwrap().unwrap();

        let mut registry = WordRegistry::new(100);
        let hund = Word::new("Hund", "de");
        let cached = registry.resolve(&mut store, &hund).unwrap();

        let dog = Word::new("dog", "en");
        let sag = Word::new("سگ", "fa");
        let ids = registry
            .resolve_all(&mut store, &[&hund, &dog, &sag, &sag])
            .unwrap();

        assert_eq!(ids[0], cached);
        assert_eq!(ids[1], WordId::Durable(dog_row));
        assert!(ids[2].is_provisional());
        assert_eq!(ids[2], ids[3]);
        // Hund and سگ; dog already had a row
        assert_eq!(registry.staged(), 2);

        registry.flush(&mut store).unwrap();
        let sag_row = store.find_word(&sag).unwrap().unwrap();
        assert_eq!(registry.durable(ids[2]), WordId::Durable(sag_row));
    }

    #[test]
    fn test_flush_splits_into_batches() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut registry = WordRegistry::new(2);
        for text in ["eins", "zwei", "drei", "vier", "fünf"] {
            registry.resolve(&mut store, &Word::new(text, "de")).unwrap();
        }
        assert!(registry.needs_flush());

        let report = registry.flush(&mut store).unwrap();
        assert_eq!(report.batches, 3);
        assert_eq!(report.inserted, 5);
        assert_eq!(report.promoted, 5);
        assert_eq!(registry.staged(), 0);
        assert!(!registry.needs_flush());
    }

    #[test]
    fn test_second_registry_reuses_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let hund = Word::new("Hund", "de");

        let mut first = WordRegistry::new(10);
        let id = first.resolve(&mut store, &hund).unwrap();
        first.flush(&mut store).unwrap();
        let durable = first.durable(id);

        let mut second = WordRegistry::new(10);
        assert_eq!(second.resolve(&mut store, &hund).unwrap(), durable);
        let report = second.flush(&mut store).unwrap();
        assert_eq!(report, FlushReport::default());
        assert_eq!(store.counts().unwrap().total_words(), 1);
    }

    #[test]
    fn test_dry_run_ids_stay_provisional() {
        let mut store = DryRunStore::new();
        let mut registry = WordRegistry::new(10);
        let id = registry.resolve(&mut store, &Word::new("سگ", "fa")).unwrap();

        let report = registry.flush(&mut store).unwrap();
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.inserted, 0);
        assert_eq!(registry.durable(id), id);
        assert_eq!(registry.resolve(&mut store, &Word::new("سگ", "fa")).unwrap(), id);
        assert_eq!(store.words_seen(), 1);
    }

    #[test]
    fn test_provisional_ids_are_distinct() {
        let mut store = DryRunStore::new();
        let mut registry = WordRegistry::new(10);
        let a = registry.resolve(&mut store, &Word::new("Hund", "de")).unwrap();
        let b = registry.resolve(&mut store, &Word::new("hund", "de")).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }
}
