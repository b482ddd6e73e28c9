//! Record extraction: one dump entry into a headword and its translations
//!
//! Wiktextract places translations either on the entry itself
//! (`"translations": [...]`) or on individual senses
//! (`"senses": [{"translations": [...]}]`); both are read. A translation's
//! language is taken from `code`, falling back to `lang_code`, and its `word`
//! may be a single string or a list of strings.

use super::source::SkipReason;
use crate::types::{LangCode, Word};
use crate::util::truncate_str;
use serde_json::{Map, Value};
use tracing::warn;

/// A headword with every translation listed for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadwordEntry {
    pub word: Word,
    pub translations: Vec<Word>,
    /// Translation entries dropped because of an unexpected shape
    pub dropped: usize,
    /// Dropped entries that named a language but carried an unusable `word`
    pub malformed: Vec<MalformedTranslation>,
}

/// A translation whose `word` was neither a string nor a list of strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedTranslation {
    pub lang: LangCode,
    /// The offending value, rendered as JSON
    pub data: String,
}

/// Turns parsed dump records into [`HeadwordEntry`] values
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    lowercase: bool,
}

impl Extractor {
    pub fn new(lowercase: bool) -> Self {
        Self { lowercase }
    }

    fn normalize(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else if self.lowercase {
            Some(trimmed.to_lowercase())
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Extract one record, or say why it has to be skipped
    pub fn extract(&self, record: &Value) -> Result<HeadwordEntry, SkipReason> {
        let obj = record.as_object().ok_or(SkipReason::NotAnObject)?;

        let text = obj
            .get("word")
            .and_then(Value::as_str)
            .and_then(|w| self.normalize(w))
            .ok_or(SkipReason::MissingWord)?;
        let lang = obj
            .get("lang_code")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(SkipReason::MissingLangCode)?;

        let headword = Word::new(text, lang);
        let mut entry = HeadwordEntry {
            word: headword,
            translations: Vec::new(),
            dropped: 0,
            malformed: Vec::new(),
        };

        self.collect_translations(obj, &mut entry)?;

        if let Some(senses) = obj.get("senses").and_then(Value::as_array) {
            for sense in senses.iter().filter_map(Value::as_object) {
                self.collect_translations(sense, &mut entry)?;
            }
        }

        Ok(entry)
    }

    fn collect_translations(
        &self,
        obj: &Map<String, Value>,
        entry: &mut HeadwordEntry,
    ) -> Result<(), SkipReason> {
        let list = match obj.get("translations") {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Array(list)) => list,
            Some(_) => return Err(SkipReason::MalformedTranslations),
        };

        for item in list {
            let Some(item) = item.as_object() else {
                entry.dropped += 1;
                continue;
            };

            let lang = item
                .get("code")
                .or_else(|| item.get("lang_code"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|l| !l.is_empty());
            let Some(lang) = lang else {
                // Translation tables carry many entries without a code; not worth a warning
                entry.dropped += 1;
                continue;
            };

            match item.get("word") {
                Some(Value::String(text)) => {
                    if let Some(text) = self.normalize(text) {
                        entry.translations.push(Word::new(text, lang));
                    }
                }
                Some(Value::Array(texts)) => {
                    for text in texts.iter().filter_map(Value::as_str) {
                        if let Some(text) = self.normalize(text) {
                            entry.translations.push(Word::new(text, lang));
                        }
                    }
                }
                None | Some(Value::Null) => {}
                Some(other) => {
                    let data = other.to_string();
                    warn!(
                        "Unexpected 'word' format in {} translation of '{}': {}",
                        lang,
                        truncate_str(&entry.word.text, 50),
                        truncate_str(&data, 80)
                    );
                    entry.dropped += 1;
                    entry.malformed.push(MalformedTranslation {
                        lang: lang.to_string(),
                        data,
                    });
                }
            }
        }

        Ok(())
    }
}
