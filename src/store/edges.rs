//! Batched translation-edge writer

use super::{StoreError, TranslationStore};
use crate::types::TranslationEdge;
use tracing::debug;

/// Stages translation edges and writes them `batch_size` at a time
pub struct EdgeWriter {
    pending: Vec<TranslationEdge>,
    batch_size: usize,
    /// Edges handed to the store so far
    written: usize,
    /// Rows the store reported as new
    inserted: usize,
    batches: usize,
}

impl EdgeWriter {
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            pending: Vec::with_capacity(batch_size),
            batch_size,
            written: 0,
            inserted: 0,
            batches: 0,
        }
    }

    /// Stage `edges`, writing every batch that fills up
    pub fn write_edges(
        &mut self,
        store: &mut dyn TranslationStore,
        edges: &[TranslationEdge],
    ) -> Result<(), StoreError> {
        for edge in edges {
            self.pending.push(*edge);
            if self.pending.len() >= self.batch_size {
                self.write_batch(store)?;
            }
        }
        Ok(())
    }

    /// Write whatever is still pending. Returns rows inserted by this call.
    pub fn flush(&mut self, store: &mut dyn TranslationStore) -> Result<usize, StoreError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        self.write_batch(store)
    }

    fn write_batch(&mut self, store: &mut dyn TranslationStore) -> Result<usize, StoreError> {
        // Pending edges are only cleared once the store accepted them
        let inserted = store.insert_edges(&self.pending)?;
        self.batches += 1;
        self.written += self.pending.len();
        self.inserted += inserted;
        debug!(
            "Edge batch #{}: {} staged, {} inserted",
            self.batches,
            self.pending.len(),
            inserted
        );
        self.pending.clear();
        Ok(inserted)
    }

    /// Edges waiting for the next batch
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Edges handed to the store
    pub fn written(&self) -> usize {
        self.written
    }

    /// Rows the store reported as newly inserted
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    pub fn batches(&self) -> usize {
        self.batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DryRunStore, SqliteStore, WordRegistry};
    use crate::types::{Word, WordId};

    fn registered_ids(store: &mut SqliteStore, texts: &[(&str, &str)]) -> Vec<WordId> {
        let mut registry = WordRegistry::new(100);
        let ids: Vec<WordId> = texts
            .iter()
            .map(|(text, lang)| registry.resolve(&mut *store, &Word::new(*text, *lang)).unwrap())
            .collect();
        registry.flush(&mut *store).unwrap();
        ids.into_iter().map(|id| registry.durable(id)).collect()
    }

    #[test]
    fn test_overlapping_writes_never_duplicate() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let ids = registered_ids(&mut store, &[("Hund", "de"), ("Köter", "de"), ("سگ", "fa")]);
        let (hund, koeter, sag) = (ids[0], ids[1], ids[2]);

        let mut writer = EdgeWriter::new(2);
        writer
            .write_edges(&mut store, &[TranslationEdge::new(hund, sag), TranslationEdge::new(koeter, sag)])
            .unwrap();
        writer
            .write_edges(&mut store, &[TranslationEdge::new(koeter, sag), TranslationEdge::new(sag, hund)])
            .unwrap();
        writer.flush(&mut store).unwrap();

        assert_eq!(writer.written(), 4);
        assert_eq!(writer.inserted(), 3);
        assert_eq!(store.counts().unwrap().translations, 3);
    }

    #[test]
    fn test_batches_fill_before_writing() {
        let mut store = DryRunStore::new();
        let mut writer = EdgeWriter::new(3);
        let edges: Vec<TranslationEdge> = (0..7)
            .map(|n| TranslationEdge::new(WordId::Provisional(n), WordId::Provisional(n + 100)))
            .collect();

        writer.write_edges(&mut store, &edges).unwrap();
        assert_eq!(writer.batches(), 2);
        assert_eq!(writer.pending(), 1);

        writer.flush(&mut store).unwrap();
        assert_eq!(writer.batches(), 3);
        assert_eq!(writer.pending(), 0);
        assert_eq!(store.edges_seen(), 7);
        assert_eq!(writer.inserted(), 0);
    }

    #[test]
    fn test_failed_batch_stays_pending() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut writer = EdgeWriter::new(10);
        let edge = TranslationEdge::new(WordId::Durable(1), WordId::Provisional(0));

        writer.write_edges(&mut store, &[edge]).unwrap();
        assert!(writer.flush(&mut store).is_err());
        assert_eq!(writer.pending(), 1);
        assert_eq!(writer.written(), 0);
    }
}
