//! Import coordinator that runs one dump through the whole pipeline
//!
//! The coordinator owns everything scoped to a run: the store connection,
//! the bridge aggregate, the word registry and the edge writer. Nothing
//! outlives it, so two coordinators never share caches.

use super::bridge::{BridgeAggregator, HeadwordRole};
use super::error_log::ErrorLog;
use super::extract::Extractor;
use super::links::{DerivedLinks, LinkDeriver, LinkKind};
use super::progress::{print_summary, ImportProgress};
use super::source::{DumpSource, ImportError, ImportStats, SkipReason};
use crate::config::{ImportConfig, StoreConfig, MAX_BATCH_SIZE};
use crate::store::{
    open_store, DryRunStore, EdgeWriter, SqliteStore, TranslationStore, WordRegistry,
};
use crate::types::{TranslationEdge, Word, WordId};
use crate::util::truncate_str;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Import coordinator for one run
pub struct ImportCoordinator {
    config: ImportConfig,
    store: Box<dyn TranslationStore>,
    extractor: Extractor,
    deriver: LinkDeriver,
    error_log: Option<ErrorLog>,
    quiet: bool,
}

impl ImportCoordinator {
    /// Create a coordinator over an already opened store
    pub fn new(config: ImportConfig, store: Box<dyn TranslationStore>) -> Self {
        let extractor = Extractor::new(config.lowercase_words);
        let deriver = LinkDeriver::new(config.languages.clone(), config.symmetric);
        Self {
            config,
            store,
            extractor,
            deriver,
            error_log: None,
            quiet: false,
        }
    }

    /// Set quiet mode (no progress output)
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Write skipped records to `log`
    pub fn with_error_log(mut self, log: ErrorLog) -> Self {
        self.error_log = Some(log);
        self
    }

    /// Run import from a dump source
    pub fn import<S: DumpSource>(&mut self, mut source: S) -> Result<ImportStats, ImportError> {
        let source_name = source.source_name().to_string();
        info!(
            "Starting import from {} into {}",
            source_name,
            self.store.describe()
        );

        let mut progress = ImportProgress::new(&source_name, self.store.is_dry_run(), self.quiet);
        let result = self.run(&mut source, &mut progress);

        if let Some(log) = self.error_log.as_mut() {
            if let Err(e) = log.flush() {
                warn!("Failed to flush error log {}: {}", log.path().display(), e);
            }
        }

        match result {
            Ok(()) => {
                progress.finish();
                let stats = progress.get_stats();
                if !self.quiet {
                    print_summary(&stats);
                }
                Ok(stats)
            }
            Err(e) => {
                progress.abandon(&e.to_string());
                Err(e)
            }
        }
    }

    fn run<S: DumpSource>(
        &mut self,
        source: &mut S,
        progress: &mut ImportProgress,
    ) -> Result<(), ImportError> {
        let mut aggregator = BridgeAggregator::new(self.config.languages.clone());

        for line_result in source.iter_lines() {
            if let Some(max) = self.config.max_records {
                if progress.stats_mut().records_processed >= max {
                    info!("Reached max records limit: {}", max);
                    break;
                }
            }

            let line = line_result?;
            let parsed = serde_json::from_slice::<Value>(&line.bytes)
                .map_err(|e| {
                    debug!("Line {}: {}", line.number, e);
                    SkipReason::InvalidJson
                })
                .and_then(|value| self.extractor.extract(&value));

            match parsed {
                Ok(entry) => {
                    progress.record_extracted(entry.dropped);
                    if let Some(log) = self.error_log.as_mut() {
                        for malformed in &entry.malformed {
                            log.record_translation(line.number, &entry.word, malformed)?;
                        }
                    }
                    match aggregator.observe(&entry) {
                        HeadwordRole::Bridge { complete } => {
                            let stats = progress.stats_mut();
                            stats.bridge_headwords += 1;
                            if complete {
                                stats.bridge_headwords_complete += 1;
                            }
                        }
                        HeadwordRole::Foreign => progress.stats_mut().foreign_headwords += 1,
                        HeadwordRole::Ignored => progress.record_ignored(),
                    }
                }
                Err(reason) => {
                    warn!(
                        "Skipping line {}: {} ({})",
                        line.number,
                        reason,
                        truncate_str(&String::from_utf8_lossy(&line.bytes), 80)
                    );
                    progress.record_skipped(reason);
                    if let Some(log) = self.error_log.as_mut() {
                        log.record(line.number, reason, &line.bytes)?;
                    }
                }
            }
        }

        debug!(
            "Read {} bytes from {}",
            source.byte_position(),
            source.source_name()
        );

        progress.stats_mut().bridge_words = aggregator.len();
        progress.stage("deriving links");
        let derived = self.deriver.derive(aggregator.into_entries());
        record_links(progress.stats_mut(), &derived);
        info!(
            "Derived {} links from {} bridge words ({} without both sides)",
            derived.len(),
            derived.bridges_linked,
            derived.bridges_partial
        );

        progress.stage("resolving words");
        let batch_size = self.config.batch_size.max(1);
        let mut registry = WordRegistry::new(batch_size);
        let mut ids: HashMap<&Word, WordId> = HashMap::new();
        let mut words_inserted = 0;

        let words: Vec<&Word> = derived.words().into_iter().collect();
        for chunk in words.chunks(batch_size) {
            let resolved = registry.resolve_all(self.store.as_mut(), chunk)?;
            ids.extend(chunk.iter().copied().zip(resolved));
            if registry.needs_flush() {
                words_inserted += registry.flush(self.store.as_mut())?.inserted;
            }
        }
        words_inserted += registry.flush(self.store.as_mut())?.inserted;

        progress.stage("writing translations");
        let mut writer = EdgeWriter::new(batch_size);
        let mut edges = Vec::with_capacity(batch_size);

        for link in &derived.links {
            let (Some(&source_id), Some(&target_id)) = (ids.get(&link.source), ids.get(&link.target))
            else {
                continue;
            };
            edges.push(TranslationEdge::new(
                registry.durable(source_id),
                registry.durable(target_id),
            ));
            if edges.len() >= batch_size {
                writer.write_edges(self.store.as_mut(), &edges)?;
                edges.clear();
            }
        }
        writer.write_edges(self.store.as_mut(), &edges)?;
        writer.flush(self.store.as_mut())?;

        let stats = progress.stats_mut();
        stats.words_resolved = registry.len();
        stats.words_inserted = words_inserted;
        stats.edges_written = writer.written();
        stats.edges_inserted = writer.inserted();

        info!(
            "Import finished: {} words resolved ({} new), {} edges written ({} new)",
            stats.words_resolved, stats.words_inserted, stats.edges_written, stats.edges_inserted
        );
        Ok(())
    }

    /// The backing store
    pub fn store_mut(&mut self) -> &mut dyn TranslationStore {
        self.store.as_mut()
    }
}

fn record_links(stats: &mut ImportStats, derived: &DerivedLinks) {
    stats.bridge_words_linked = derived.bridges_linked;
    stats.bridge_words_partial = derived.bridges_partial;
    stats.source_bridge_links = derived.count(LinkKind::SourceToBridge);
    stats.bridge_target_links = derived.count(LinkKind::BridgeToTarget);
    stats.source_target_links = derived.count(LinkKind::SourceToTarget);
    stats.target_source_links = derived.count(LinkKind::TargetToSource);
}

/// Builder for ImportCoordinator with sensible defaults
pub struct ImportCoordinatorBuilder {
    config: ImportConfig,
    store_config: StoreConfig,
    store: Option<Box<dyn TranslationStore>>,
    quiet: bool,
}

impl ImportCoordinatorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: ImportConfig::default(),
            store_config: StoreConfig::default(),
            store: None,
            quiet: false,
        }
    }

    /// Set import configuration
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Set store configuration (ignored when a store is supplied)
    pub fn with_store_config(mut self, config: StoreConfig) -> Self {
        self.store_config = config;
        self
    }

    /// Use an already opened store
    pub fn with_store(mut self, store: Box<dyn TranslationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Enable/disable dry run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Set maximum records to read
    pub fn with_max_records(mut self, max_records: Option<usize>) -> Self {
        self.config.max_records = max_records;
        self
    }

    /// Write skipped records to a file
    pub fn with_error_log(mut self, path: impl AsRef<Path>) -> Self {
        self.config.error_log = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set quiet mode
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Build the coordinator
    pub fn build(self) -> Result<ImportCoordinator, ImportError> {
        if self.config.batch_size == 0 || self.config.batch_size > MAX_BATCH_SIZE {
            return Err(ImportError::Config(format!(
                "batch_size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, self.config.batch_size
            )));
        }

        let store = match self.store {
            Some(store) if self.config.dry_run && !store.is_dry_run() => {
                return Err(ImportError::Config(
                    "Dry run requested but a persistent store was supplied.".into(),
                ));
            }
            Some(store) => store,
            None => open_store(&self.store_config, self.config.dry_run)?,
        };

        let error_log = self
            .config
            .error_log
            .as_ref()
            .map(ErrorLog::create)
            .transpose()?;

        let mut coordinator = ImportCoordinator::new(self.config, store).with_quiet(self.quiet);
        if let Some(log) = error_log {
            coordinator = coordinator.with_error_log(log);
        }
        Ok(coordinator)
    }
}

impl Default for ImportCoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience: a coordinator over an in-memory SQLite store
pub fn in_memory_coordinator(config: ImportConfig) -> Result<ImportCoordinator, ImportError> {
    let store: Box<dyn TranslationStore> = if config.dry_run {
        Box::new(DryRunStore::new())
    } else {
        Box::new(SqliteStore::open_in_memory()?)
    };
    ImportCoordinatorBuilder::new()
        .with_config(config)
        .with_store(store)
        .with_quiet(true)
        .build()
}
