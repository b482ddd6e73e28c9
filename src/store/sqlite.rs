//! SQLite backend
//!
//! Owns a single connection. Every batch runs inside its own transaction, so a
//! failed batch rolls back as a whole and nothing from it is reported as
//! written.

use super::{StoreCounts, StoreError, TranslationStore};
use crate::config::StoreConfig;
use crate::types::{TranslationEdge, Word};
use rusqlite::{params, params_from_iter, Connection};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// DDL for the two tables the importer relies on
const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word_text TEXT NOT NULL,
        lang_code TEXT NOT NULL,
        UNIQUE(word_text, lang_code)
    );",
    "CREATE TABLE IF NOT EXISTS translations (
        source_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
        target_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
        PRIMARY KEY (source_id, target_id)
    );",
    "CREATE INDEX IF NOT EXISTS idx_translations_target ON translations(target_id);",
];

const INSERT_WORD: &str = "INSERT OR IGNORE INTO words (word_text, lang_code) VALUES (?1, ?2)";

/// Words looked up per `SELECT`; two bound parameters each
const LOOKUP_CHUNK: usize = 500;
const INSERT_EDGE: &str =
    "INSERT OR IGNORE INTO translations (source_id, target_id) VALUES (?1, ?2)";

/// SQLite-backed translation store
pub struct SqliteStore {
    conn: Connection,
    /// None for in-memory databases
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = Connection::open(&config.database)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        let store = Self::init(conn, Some(config.database.clone()))?;
        info!("Opened store at {}", config.database.display());
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        for statement in SCHEMA_STATEMENTS {
            conn.execute_batch(statement)?;
        }
        Ok(Self { conn, path })
    }

    /// Underlying connection, for ad-hoc queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// `SELECT` matching `n` (text, lang) pairs in one statement
fn select_words_sql(n: usize) -> String {
    let values: Vec<String> = (0..n)
        .map(|i| format!("(?{}, ?{})", 2 * i + 1, 2 * i + 2))
        .collect();
    format!(
        "SELECT id, word_text, lang_code FROM words \
         WHERE (word_text, lang_code) IN (VALUES {})",
        values.join(", ")
    )
}

fn insert_words_tx(conn: &mut Connection, words: &[Word]) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare_cached(INSERT_WORD)?;
        for word in words {
            inserted += stmt.execute(params![word.text, word.lang])?;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

fn insert_edges_tx(conn: &mut Connection, edges: &[(i64, i64)]) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare_cached(INSERT_EDGE)?;
        for (source, target) in edges {
            inserted += stmt.execute(params![source, target])?;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

impl TranslationStore for SqliteStore {
    fn find_words(&mut self, words: &[Word]) -> Result<HashMap<Word, i64>, StoreError> {
        let mut found = HashMap::with_capacity(words.len());
        for chunk in words.chunks(LOOKUP_CHUNK) {
            let mut stmt = self.conn.prepare_cached(&select_words_sql(chunk.len()))?;
            let bound = chunk
                .iter()
                .flat_map(|w| [w.text.as_str(), w.lang.as_str()]);
            let mut rows = stmt.query(params_from_iter(bound))?;
            while let Some(row) = rows.next()? {
                let text: String = row.get(1)?;
                let lang: String = row.get(2)?;
                found.insert(Word::new(text, lang), row.get::<_, i64>(0)?);
            }
        }
        Ok(found)
    }

    fn insert_words(&mut self, words: &[Word]) -> Result<usize, StoreError> {
        if words.is_empty() {
            return Ok(0);
        }
        let inserted = insert_words_tx(&mut self.conn, words).map_err(|source| {
            StoreError::BatchWrite {
                table: "words",
                rows: words.len(),
                source,
            }
        })?;
        debug!("Inserted {} of {} staged words", inserted, words.len());
        Ok(inserted)
    }

    fn insert_edges(&mut self, edges: &[TranslationEdge]) -> Result<usize, StoreError> {
        if edges.is_empty() {
            return Ok(0);
        }
        let rows = edges
            .iter()
            .map(|edge| {
                edge.as_durable().ok_or_else(|| {
                    StoreError::UnresolvedWord(edge.source.to_string(), edge.target.to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let inserted = insert_edges_tx(&mut self.conn, &rows).map_err(|source| {
            StoreError::BatchWrite {
                table: "translations",
                rows: rows.len(),
                source,
            }
        })?;
        debug!("Inserted {} of {} staged translations", inserted, rows.len());
        Ok(inserted)
    }

    fn counts(&mut self) -> Result<StoreCounts, StoreError> {
        let mut counts = StoreCounts::default();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT lang_code, COUNT(*) FROM words GROUP BY lang_code")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (lang, count) = row?;
                counts.words_by_lang.insert(lang, count as u64);
            }
        }
        let translations: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))?;
        counts.translations = translations as u64;
        Ok(counts)
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite:{}", path.display()),
            None => "sqlite::memory:".to_string(),
        }
    }
}
