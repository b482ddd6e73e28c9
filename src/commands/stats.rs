use anyhow::{Context, Result};
use lexbridge::{
    config::Config,
    store::{SqliteStore, TranslationStore},
};
use std::path::PathBuf;

pub fn show_stats(mut config: Config, db: Option<PathBuf>) -> Result<()> {
    if let Some(db) = db {
        config.store.database = db;
    }

    let database = &config.store.database;
    if !database.is_file() {
        anyhow::bail!(
            "Database not found: {}\n\nTo create it, import a dump with:\n  lexbridge import <dump-file>",
            database.display()
        );
    }

    let mut store = SqliteStore::open(&config.store)
        .with_context(|| format!("Failed to open database: {}", database.display()))?;
    let counts = store.counts()?;

    println!("\nTranslation Store Statistics");
    println!("============================");
    println!("Database:      {}", database.display());
    println!("Words:         {}", counts.total_words());
    for (lang, count) in &counts.words_by_lang {
        println!("  {:<11} {}", lang, count);
    }
    println!("Translations:  {}", counts.translations);

    Ok(())
}
