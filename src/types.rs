//! Core types shared by the import pipeline and the store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language code as it appears in the dump (`"en"`, `"de"`, `"fa"`, ...)
pub type LangCode = String;

// ============================================================================
// Words
// ============================================================================

/// A word in a specific language.
///
/// Identity is the exact `(text, lang)` pair: comparison is case-sensitive and
/// performs no Unicode normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Word {
    /// Surface form of the word
    pub text: String,
    /// Language code
    pub lang: LangCode,
}

impl Word {
    pub fn new(text: impl Into<String>, lang: impl Into<LangCode>) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.lang)
    }
}

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier handed out by the word registry.
///
/// A `Durable` id is the primary key of a persisted row. A `Provisional` id is
/// a run-local counter for a word that has been staged but not yet flushed
/// (or never will be, in a dry run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WordId {
    Durable(i64),
    Provisional(u64),
}

impl WordId {
    /// Row id, if this id has been persisted
    pub fn as_durable(&self) -> Option<i64> {
        match self {
            WordId::Durable(id) => Some(*id),
            WordId::Provisional(_) => None,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, WordId::Provisional(_))
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordId::Durable(id) => write!(f, "#{}", id),
            WordId::Provisional(n) => write!(f, "provisional-{}", n),
        }
    }
}

/// Directed translation edge between two registered words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TranslationEdge {
    pub source: WordId,
    pub target: WordId,
}

impl TranslationEdge {
    pub fn new(source: WordId, target: WordId) -> Self {
        Self { source, target }
    }

    /// Both endpoints as row ids, or `None` if either is still provisional
    pub fn as_durable(&self) -> Option<(i64, i64)> {
        Some((self.source.as_durable()?, self.target.as_durable()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_identity_is_case_sensitive() {
        assert_ne!(Word::new("Hund", "de"), Word::new("hund", "de"));
        assert_ne!(Word::new("Hund", "de"), Word::new("Hund", "en"));
        assert_eq!(Word::new("Hund", "de"), Word::new("Hund".to_string(), "de"));
    }

    #[test]
    fn test_edge_durability() {
        let durable = TranslationEdge::new(WordId::Durable(1), WordId::Durable(2));
        assert_eq!(durable.as_durable(), Some((1, 2)));

        let mixed = TranslationEdge::new(WordId::Durable(1), WordId::Provisional(0));
        assert_eq!(mixed.as_durable(), None);
        assert!(mixed.target.is_provisional());
    }

    #[test]
    fn test_word_id_display() {
        assert_eq!(WordId::Durable(42).to_string(), "#42");
        assert_eq!(WordId::Provisional(3).to_string(), "provisional-3");
    }
}
