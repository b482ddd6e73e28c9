//! Per-record error summary file
//!
//! One entry per skipped record, and one per translation whose `word` had an
//! unusable shape:
//!
//! ```text
//! L17_WARN_NO_LANG_CODE: entry with no 'lang_code' field
//! Line: {"word": "dog", ...}
//! L42_WARN_DE_TRANS_FORMAT: Unexpected 'word' format for de translation of 'dog'. Data: '{"x":1}'
//! ```

use super::extract::MalformedTranslation;
use super::source::{ImportError, SkipReason};
use crate::types::Word;
use crate::util::truncate_str;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Characters of the offending line kept in the log
const SNIPPET_CHARS: usize = 200;

pub struct ErrorLog {
    path: PathBuf,
    writer: BufWriter<File>,
    entries: usize,
}

impl ErrorLog {
    /// Create (truncating) the log file
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            entries: 0,
        })
    }

    pub fn record(&mut self, line: u64, reason: SkipReason, raw: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(raw);
        writeln!(
            self.writer,
            "L{}_WARN_{}: {}\nLine: {}",
            line,
            reason.code(),
            reason,
            truncate_str(&text, SNIPPET_CHARS)
        )?;
        self.entries += 1;
        Ok(())
    }

    /// Note a translation of `headword` that was dropped for its shape
    pub fn record_translation(
        &mut self,
        line: u64,
        headword: &Word,
        translation: &MalformedTranslation,
    ) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "L{}_WARN_{}_TRANS_FORMAT: Unexpected 'word' format for {} translation of '{}'. Data: '{}'",
            line,
            translation.lang.to_ascii_uppercase(),
            translation.lang,
            headword.text,
            truncate_str(&translation.data, SNIPPET_CHARS)
        )?;
        self.entries += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
