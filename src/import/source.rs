//! Core types and traits for dump import

use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// One raw line of a dump, before JSON parsing
#[derive(Debug, Clone)]
pub struct DumpLine {
    /// 1-based line number in the (decompressed) dump
    pub number: u64,
    /// Line content without the trailing newline
    pub bytes: Vec<u8>,
}

/// Trait for dump sources that can be iterated over
pub trait DumpSource {
    /// Iterate over the non-blank lines of the dump
    fn iter_lines(&mut self) -> Box<dyn Iterator<Item = Result<DumpLine, ImportError>> + '_>;

    /// Bytes consumed so far (after decompression)
    fn byte_position(&self) -> u64;

    /// Get the source name for display
    fn source_name(&self) -> &str;
}

/// Why a record was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Line is not valid JSON (or not valid UTF-8)
    InvalidJson,
    /// Line is valid JSON but not an object
    NotAnObject,
    /// Headword text missing or empty
    MissingWord,
    /// Headword language code missing or empty
    MissingLangCode,
    /// A translation list is present but is not an array
    MalformedTranslations,
}

impl SkipReason {
    /// Short tag used in the error log
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson => "JSON_ERROR",
            Self::NotAnObject => "NOT_AN_OBJECT",
            Self::MissingWord => "NO_WORD",
            Self::MissingLangCode => "NO_LANG_CODE",
            Self::MalformedTranslations => "BAD_TRANSLATIONS",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidJson => "JSON parse error",
            Self::NotAnObject => "record is not a JSON object",
            Self::MissingWord => "entry with no 'word' field",
            Self::MissingLangCode => "entry with no 'lang_code' field",
            Self::MalformedTranslations => "'translations' is not a list",
        };
        f.write_str(text)
    }
}

/// Import statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportStats {
    /// Non-blank lines read
    pub records_processed: usize,
    /// Records turned into headword entries
    pub records_extracted: usize,
    /// Records skipped as unreadable or malformed
    pub records_skipped: usize,
    /// Skipped records by reason
    pub skip_reasons: BTreeMap<SkipReason, usize>,
    /// Readable records in a language outside the bridge
    pub records_ignored: usize,
    /// Individual translation entries dropped for an unexpected shape
    pub translations_dropped: usize,
    /// Headwords in the bridge language
    pub bridge_headwords: usize,
    /// Bridge-language headwords listing both source and target translations
    pub bridge_headwords_complete: usize,
    /// Headwords in the source or target language contributing to a bridge
    pub foreign_headwords: usize,
    /// Distinct bridge words collected
    pub bridge_words: usize,
    /// Bridge words with both sides non-empty
    pub bridge_words_linked: usize,
    /// Bridge words missing one side
    pub bridge_words_partial: usize,
    /// source -> bridge links derived
    pub source_bridge_links: usize,
    /// bridge -> target links derived
    pub bridge_target_links: usize,
    /// source -> target links derived
    pub source_target_links: usize,
    /// target -> source links derived
    pub target_source_links: usize,
    /// Distinct words resolved through the registry
    pub words_resolved: usize,
    /// Word rows actually inserted
    pub words_inserted: usize,
    /// Translation edges handed to the store
    pub edges_written: usize,
    /// Translation rows actually inserted
    pub edges_inserted: usize,
    /// Whether the run was a dry run
    pub dry_run: bool,
    /// Processing time in seconds
    pub elapsed_seconds: f64,
    /// Records per second
    pub records_per_second: f64,
}

impl ImportStats {
    /// Calculate records per second
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.records_per_second = self.records_processed as f64 / self.elapsed_seconds;
        }
    }

    /// Total links derived across all kinds
    pub fn links_derived(&self) -> usize {
        self.source_bridge_links
            + self.bridge_target_links
            + self.source_target_links
            + self.target_source_links
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skip_reasons.get(&reason).copied().unwrap_or(0)
    }
}

/// Errors that can occur during import
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Dump format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DumpFormat {
    /// One JSON object per line
    JsonLines,
    /// JSON lines compressed with bzip2
    JsonLinesBz2,
}

impl DumpFormat {
    /// Detect format from file path
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_lowercase();

        if name.ends_with(".jsonl.bz2") || name.ends_with(".json.bz2") {
            Some(DumpFormat::JsonLinesBz2)
        } else if name.ends_with(".jsonl") || name.ends_with(".json") {
            Some(DumpFormat::JsonLines)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DumpFormat::detect(Path::new("raw-wiktextract-data.jsonl")),
            Some(DumpFormat::JsonLines)
        );
        assert_eq!(
            DumpFormat::detect(Path::new("raw-wiktextract-data.JSONL.bz2")),
            Some(DumpFormat::JsonLinesBz2)
        );
        assert_eq!(DumpFormat::detect(Path::new("dump.xml.bz2")), None);
    }

    #[test]
    fn test_links_derived_sums_kinds() {
        let stats = ImportStats {
            source_bridge_links: 2,
            bridge_target_links: 1,
            source_target_links: 2,
            target_source_links: 2,
            ..ImportStats::default()
        };
        assert_eq!(stats.links_derived(), 7);
    }

    #[test]
    fn test_skip_reason_codes_are_distinct() {
        let reasons = [
            SkipReason::InvalidJson,
            SkipReason::NotAnObject,
            SkipReason::MissingWord,
            SkipReason::MissingLangCode,
            SkipReason::MalformedTranslations,
        ];
        let codes: std::collections::HashSet<_> = reasons.iter().map(|r| r.code()).collect();
        assert_eq!(codes.len(), reasons.len());
    }
}
