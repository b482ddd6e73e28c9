//! lexbridge: German-Persian translation links from Wiktextract dumps
//!
//! Reads a Wiktextract JSONL dump, collects German and Persian words that
//! share an English translation, and stores the resulting translation graph
//! in SQLite:
//! - Streaming JSONL reader (plain or bzip2)
//! - Bridge aggregation over both translation directions
//! - Batched, idempotent word and edge writes
//! - Dry-run mode that computes everything and writes nothing

pub mod config;
pub mod import;
pub mod store;
pub mod types;
pub mod util;

pub use config::Config;
pub use types::*;
