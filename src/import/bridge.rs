//! Bridge aggregation: per bridge word, the source and target words seen
//!
//! Both directions of the dump feed the same entries. An English headword
//! contributes its German and Persian translations; a German or Persian
//! headword contributes itself to every English word it translates to.

use super::extract::HeadwordEntry;
use crate::config::BridgeLanguages;
use std::collections::{BTreeSet, HashMap};

/// Source and target words attached to one bridge word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeEntry {
    /// Source-language words (German)
    pub source_words: BTreeSet<String>,
    /// Target-language words (Persian)
    pub target_words: BTreeSet<String>,
}

impl BridgeEntry {
    /// Both sides have at least one word
    pub fn is_linked(&self) -> bool {
        !self.source_words.is_empty() && !self.target_words.is_empty()
    }
}

/// What role a headword played in aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadwordRole {
    /// Bridge-language headword; `complete` if it listed both sides
    Bridge { complete: bool },
    /// Source- or target-language headword translating into the bridge language
    Foreign,
    /// Language outside the bridge, or nothing usable
    Ignored,
}

/// Accumulates [`BridgeEntry`] values keyed by bridge word text
#[derive(Debug)]
pub struct BridgeAggregator {
    languages: BridgeLanguages,
    entries: HashMap<String, BridgeEntry>,
}

impl BridgeAggregator {
    pub fn new(languages: BridgeLanguages) -> Self {
        Self {
            languages,
            entries: HashMap::new(),
        }
    }

    /// Fold one headword into the aggregate
    pub fn observe(&mut self, entry: &HeadwordEntry) -> HeadwordRole {
        let lang = entry.word.lang.as_str();

        if lang == self.languages.bridge {
            let bridge = entry.word.text.as_str();
            let mut has_source = false;
            let mut has_target = false;
            for translation in &entry.translations {
                if translation.lang == self.languages.source {
                    self.add_source(bridge, &translation.text);
                    has_source = true;
                } else if translation.lang == self.languages.target {
                    self.add_target(bridge, &translation.text);
                    has_target = true;
                }
            }
            return HeadwordRole::Bridge {
                complete: has_source && has_target,
            };
        }

        let is_source = lang == self.languages.source;
        if !is_source && lang != self.languages.target {
            return HeadwordRole::Ignored;
        }

        let mut contributed = false;
        for translation in &entry.translations {
            if translation.lang != self.languages.bridge {
                continue;
            }
            if is_source {
                self.add_source(&translation.text, &entry.word.text);
            } else {
                self.add_target(&translation.text, &entry.word.text);
            }
            contributed = true;
        }

        if contributed {
            HeadwordRole::Foreign
        } else {
            HeadwordRole::Ignored
        }
    }

    /// Record `word` as a source-language translation of `bridge`.
    /// Returns false if it was already known.
    pub fn add_source(&mut self, bridge: &str, word: &str) -> bool {
        self.entry_mut(bridge).source_words.insert(word.to_string())
    }

    /// Record `word` as a target-language translation of `bridge`.
    /// Returns false if it was already known.
    pub fn add_target(&mut self, bridge: &str, word: &str) -> bool {
        self.entry_mut(bridge).target_words.insert(word.to_string())
    }

    fn entry_mut(&mut self, bridge: &str) -> &mut BridgeEntry {
        self.entries.entry(bridge.to_string()).or_default()
    }

    pub fn get(&self, bridge: &str) -> Option<&BridgeEntry> {
        self.entries.get(bridge)
    }

    /// Number of distinct bridge words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the aggregator, handing over all entries
    pub fn into_entries(self) -> HashMap<String, BridgeEntry> {
        self.entries
    }
}
