//! End-to-end import tests against on-disk dumps and databases

use lexbridge::{
    config::{ImportConfig, StoreConfig},
    import::{ImportCoordinatorBuilder, ImportStats, JsonlSource, SkipReason},
    store::{SqliteStore, TranslationStore},
};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DUMP: &[&str] = &[
    r#"{"word": "dog", "lang_code": "en", "pos": "noun", "translations": [{"code": "de", "lang": "German", "word": "Hund"}, {"code": "fa", "lang": "Persian", "word": "سگ"}, {"code": "fr", "word": "chien"}]}"#,
    r#"{"word": "Köter", "lang_code": "de", "senses": [{"translations": [{"code": "en", "word": "dog"}]}]}"#,
    r#"{"word": "cat", "lang_code": "en", "translations": [{"code": "de", "word": "Katze"}]}"#,
    r#"{"word": "گربه", "lang_code": "fa", "translations": [{"lang_code": "en", "word": ["cat", "kitty"]}]}"#,
    r#"{"word": "water", "lang_code": "en", "translations": [{"code": "de", "word": "Wasser"}]}"#,
];

fn write_dump(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("dump.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

fn store_config(dir: &Path) -> StoreConfig {
    StoreConfig {
        database: dir.join("dict.sqlite3"),
        ..StoreConfig::default()
    }
}

fn run_import(dump: &Path, store: &StoreConfig, config: ImportConfig) -> ImportStats {
    let mut coordinator = ImportCoordinatorBuilder::new()
        .with_config(config)
        .with_store_config(store.clone())
        .with_quiet(true)
        .build()
        .unwrap();
    coordinator.import(JsonlSource::open(dump).unwrap()).unwrap()
}

fn translation_pairs(store: &StoreConfig) -> BTreeSet<(String, String, String, String)> {
    let store = SqliteStore::open(store).unwrap();
    let mut stmt = store
        .connection()
        .prepare(
            "SELECT s.word_text, s.lang_code, t.word_text, t.lang_code
             FROM translations tr
             JOIN words s ON s.id = tr.source_id
             JOIN words t ON t.id = tr.target_id",
        )
        .unwrap();
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })
        .unwrap();
    rows.map(|r| r.unwrap()).collect()
}

fn pair(s: &str, sl: &str, t: &str, tl: &str) -> (String, String, String, String) {
    (s.into(), sl.into(), t.into(), tl.into())
}

#[test]
fn test_bridge_produces_cross_product() {
    let temp_dir = TempDir::new().unwrap();
    let dump = write_dump(temp_dir.path(), DUMP);
    let store = store_config(temp_dir.path());

    let config = ImportConfig {
        symmetric: false,
        ..ImportConfig::default()
    };
    let stats = run_import(&dump, &store, config);

    let pairs = translation_pairs(&store);
    assert!(pairs.contains(&pair("Hund", "de", "سگ", "fa")));
    assert!(pairs.contains(&pair("Köter", "de", "سگ", "fa")));
    assert!(pairs.contains(&pair("Katze", "de", "گربه", "fa")));
    assert!(pairs.contains(&pair("Hund", "de", "dog", "en")));
    assert!(pairs.contains(&pair("dog", "en", "سگ", "fa")));

    // "water" and "kitty" each lack one side and contribute nothing
    assert!(!pairs.iter().any(|p| p.0 == "Wasser" || p.2 == "Wasser"));
    assert!(!pairs.iter().any(|p| p.0 == "kitty" || p.2 == "kitty"));
    assert!(!pairs.iter().any(|p| p.1 == "fa" && p.3 == "de"));

    let direct: Vec<_> = pairs.iter().filter(|p| p.1 == "de" && p.3 == "fa").collect();
    assert_eq!(direct.len(), 3);
    assert_eq!(stats.source_target_links, 3);
    assert_eq!(stats.bridge_words_linked, 2);
    assert_eq!(stats.bridge_words_partial, 2);
}

#[test]
fn test_symmetric_links_reverse_direction() {
    let temp_dir = TempDir::new().unwrap();
    let dump = write_dump(temp_dir.path(), DUMP);
    let store = store_config(temp_dir.path());

    run_import(&dump, &store, ImportConfig::default());

    let pairs = translation_pairs(&store);
    assert!(pairs.contains(&pair("سگ", "fa", "Hund", "de")));
    assert!(pairs.contains(&pair("سگ", "fa", "Köter", "de")));
    assert!(pairs.contains(&pair("گربه", "fa", "Katze", "de")));
}

#[test]
fn test_rerun_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let dump = write_dump(temp_dir.path(), DUMP);
    let store = store_config(temp_dir.path());

    let first = run_import(&dump, &store, ImportConfig::default());
    let counts_once = SqliteStore::open(&store).unwrap().counts().unwrap();

    let second = run_import(&dump, &store, ImportConfig::default());
    let counts_twice = SqliteStore::open(&store).unwrap().counts().unwrap();

    assert_eq!(counts_once, counts_twice);
    assert!(first.edges_inserted > 0);
    assert_eq!(second.words_inserted, 0);
    assert_eq!(second.edges_inserted, 0);
    assert_eq!(first.edges_written, second.edges_written);
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let dump = write_dump(temp_dir.path(), DUMP);
    let store = store_config(temp_dir.path());

    let dry_config = ImportConfig {
        dry_run: true,
        ..ImportConfig::default()
    };
    let dry = run_import(&dump, &store, dry_config);
    assert!(!store.database.exists(), "dry run must not create the database");

    let real = run_import(&dump, &store, ImportConfig::default());

    assert!(dry.dry_run);
    assert_eq!(dry.records_processed, real.records_processed);
    assert_eq!(dry.records_skipped, real.records_skipped);
    assert_eq!(dry.bridge_words, real.bridge_words);
    assert_eq!(dry.links_derived(), real.links_derived());
    assert_eq!(dry.words_resolved, real.words_resolved);
    assert_eq!(dry.edges_written, real.edges_written);
    assert_eq!(dry.words_inserted, 0);
    assert_eq!(dry.edges_inserted, 0);
}

#[test]
fn test_bad_records_are_skipped_and_logged() {
    let temp_dir = TempDir::new().unwrap();
    let mut lines = vec![
        r#"{"word": "dog", "translations": [{"code": "de", "word": "Hund"}]}"#,
        "this is not json",
    ];
    lines.extend_from_slice(DUMP);
    let dump = write_dump(temp_dir.path(), &lines);
    let store = store_config(temp_dir.path());
    let error_log = temp_dir.path().join("errors.txt");

    let config = ImportConfig {
        error_log: Some(error_log.clone()),
        ..ImportConfig::default()
    };
    let stats = run_import(&dump, &store, config);

    assert_eq!(stats.records_processed, 7);
    assert_eq!(stats.records_skipped, 2);
    assert_eq!(stats.skipped_for(SkipReason::MissingLangCode), 1);
    assert_eq!(stats.skipped_for(SkipReason::InvalidJson), 1);
    // later records still went through
    assert!(translation_pairs(&store).contains(&pair("Hund", "de", "سگ", "fa")));

    let log = std::fs::read_to_string(&error_log).unwrap();
    assert!(log.contains("L1_WARN_NO_LANG_CODE"));
    assert!(log.contains("L2_WARN_JSON_ERROR"));
}

#[test]
fn test_bz2_dump() {
    use bzip2::write::BzEncoder;
    use bzip2::Compression;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dump.jsonl.bz2");
    let mut encoder = BzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::fast());
    for line in DUMP {
        writeln!(encoder, "{}", line).unwrap();
    }
    encoder.finish().unwrap();

    let store = store_config(temp_dir.path());
    let stats = run_import(&path, &store, ImportConfig::default());
    assert_eq!(stats.records_processed, DUMP.len());
    assert!(translation_pairs(&store).contains(&pair("Köter", "de", "سگ", "fa")));
}
