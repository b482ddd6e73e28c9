//! Link derivation over completed bridge entries
//!
//! For a bridge word with source set G and target set F the deriver emits
//! G → bridge, bridge → F and the cross product G × F (plus F × G when links
//! are symmetric). A bridge word with an empty side emits nothing.

use super::bridge::BridgeEntry;
use crate::config::BridgeLanguages;
use crate::types::Word;
use std::collections::BTreeSet;

/// Which pair of languages a link connects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkKind {
    SourceToBridge,
    BridgeToTarget,
    SourceToTarget,
    TargetToSource,
}

/// A directed translation link between two words
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub source: Word,
    pub target: Word,
    pub kind: LinkKind,
}

impl Link {
    fn new(source: Word, target: Word, kind: LinkKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }
}

/// Everything derived from one aggregation pass
#[derive(Debug, Clone, Default)]
pub struct DerivedLinks {
    /// Union of all links, deduplicated
    pub links: BTreeSet<Link>,
    /// Bridge words that produced links
    pub bridges_linked: usize,
    /// Bridge words dropped for having an empty side
    pub bridges_partial: usize,
}

impl DerivedLinks {
    pub fn count(&self, kind: LinkKind) -> usize {
        self.links.iter().filter(|l| l.kind == kind).count()
    }

    /// Every distinct word mentioned by a link
    pub fn words(&self) -> BTreeSet<&Word> {
        self.links
            .iter()
            .flat_map(|l| [&l.source, &l.target])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Computes links from bridge entries
#[derive(Debug, Clone)]
pub struct LinkDeriver {
    languages: BridgeLanguages,
    symmetric: bool,
}

impl LinkDeriver {
    pub fn new(languages: BridgeLanguages, symmetric: bool) -> Self {
        Self {
            languages,
            symmetric,
        }
    }

    /// Links contributed by a single bridge word
    pub fn derive_bridge(&self, bridge: &str, entry: &BridgeEntry) -> Vec<Link> {
        if !entry.is_linked() {
            return Vec::new();
        }

        let langs = &self.languages;
        let bridge_word = Word::new(bridge, langs.bridge.as_str());
        let sources: Vec<Word> = entry
            .source_words
            .iter()
            .map(|w| Word::new(w.as_str(), langs.source.as_str()))
            .collect();
        let targets: Vec<Word> = entry
            .target_words
            .iter()
            .map(|w| Word::new(w.as_str(), langs.target.as_str()))
            .collect();

        let pairs = sources.len() * targets.len();
        let mut links =
            Vec::with_capacity(sources.len() + targets.len() + pairs * if self.symmetric { 2 } else { 1 });

        for source in &sources {
            links.push(Link::new(source.clone(), bridge_word.clone(), LinkKind::SourceToBridge));
        }
        for target in &targets {
            links.push(Link::new(bridge_word.clone(), target.clone(), LinkKind::BridgeToTarget));
        }
        for source in &sources {
            for target in &targets {
                links.push(Link::new(source.clone(), target.clone(), LinkKind::SourceToTarget));
                if self.symmetric {
                    links.push(Link::new(target.clone(), source.clone(), LinkKind::TargetToSource));
                }
            }
        }

        links
    }

    /// Links for every bridge word, unioned
    pub fn derive<I>(&self, entries: I) -> DerivedLinks
    where
        I: IntoIterator<Item = (String, BridgeEntry)>,
    {
        let mut derived = DerivedLinks::default();
        for (bridge, entry) in entries {
            if entry.is_linked() {
                derived.links.extend(self.derive_bridge(&bridge, &entry));
                derived.bridges_linked += 1;
            } else {
                derived.bridges_partial += 1;
            }
        }
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sources: &[&str], targets: &[&str]) -> BridgeEntry {
        BridgeEntry {
            source_words: sources.iter().map(|s| s.to_string()).collect(),
            target_words: targets.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn deriver(symmetric: bool) -> LinkDeriver {
        LinkDeriver::new(BridgeLanguages::default(), symmetric)
    }

    #[test]
    fn test_cross_product_for_one_bridge() {
        let links = deriver(false).derive_bridge("dog", &entry(&["Hund", "Köter"], &["سگ"]));

        let direct: BTreeSet<(String, String)> = links
            .iter()
            .filter(|l| l.kind == LinkKind::SourceToTarget)
            .map(|l| (l.source.text.clone(), l.target.text.clone()))
            .collect();
        let expected: BTreeSet<(String, String)> = [("Hund", "سگ"), ("Köter", "سگ")]
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();
        assert_eq!(direct, expected);

        assert!(links.iter().all(|l| l.kind != LinkKind::TargetToSource));
        // Hund->dog, Köter->dog, dog->سگ, plus the two direct links
        assert_eq!(links.len(), 5);
    }

    #[test]
    fn test_direct_links_carry_languages() {
        let links = deriver(false).derive_bridge("dog", &entry(&["Hund"], &["سگ"]));
        let direct = links
            .iter()
            .find(|l| l.kind == LinkKind::SourceToTarget)
            .unwrap();
        assert_eq!(direct.source, Word::new("Hund", "de"));
        assert_eq!(direct.target, Word::new("سگ", "fa"));
    }

    #[test]
    fn test_symmetric_adds_reverse_links() {
        let links = deriver(true).derive_bridge("dog", &entry(&["Hund", "Köter"], &["سگ"]));
        let reverse: Vec<&Link> = links
            .iter()
            .filter(|l| l.kind == LinkKind::TargetToSource)
            .collect();
        assert_eq!(reverse.len(), 2);
        assert!(reverse.iter().all(|l| l.source == Word::new("سگ", "fa")));
    }

    #[test]
    fn test_empty_side_emits_nothing() {
        let d = deriver(true);
        assert!(d.derive_bridge("cat", &entry(&["Katze"], &[])).is_empty());
        assert!(d.derive_bridge("cat", &entry(&[], &["گربه"])).is_empty());
    }

    #[test]
    fn test_derive_unions_and_counts() {
        let entries = vec![
            ("dog".to_string(), entry(&["Hund", "Köter"], &["سگ"])),
            ("hound".to_string(), entry(&["Hund"], &["سگ"])),
            ("cat".to_string(), entry(&["Katze"], &[])),
        ];
        let derived = deriver(false).derive(entries);

        assert_eq!(derived.bridges_linked, 2);
        assert_eq!(derived.bridges_partial, 1);
        // Hund->سگ appears under both bridges but only once in the union
        assert_eq!(derived.count(LinkKind::SourceToTarget), 2);
        assert_eq!(derived.count(LinkKind::SourceToBridge), 3);
        assert_eq!(derived.count(LinkKind::BridgeToTarget), 2);
        // dog, hound, Hund, Köter, سگ
        assert_eq!(derived.words().len(), 5);
    }
}
