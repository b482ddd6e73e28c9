//! Bulk import of Wiktextract dumps into the translation store
//!
//! A dump is read once. Every record is reduced to a headword and its
//! translations, folded into per-bridge-word aggregates, and once the dump
//! is exhausted the aggregates are turned into translation links, resolved
//! to word ids and written in batches.
//!
//! # Example Usage
//!
//! ```no_run
//! use lexbridge::import::{ImportCoordinatorBuilder, JsonlSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = JsonlSource::open("raw-wiktextract-data.jsonl.bz2")?;
//!
//! let mut coordinator = ImportCoordinatorBuilder::new()
//!     .with_batch_size(500)
//!     .with_dry_run(true)
//!     .build()?;
//!
//! let stats = coordinator.import(source)?;
//! println!("Derived {} links", stats.links_derived());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Import Coordinator                          │
//! │                (progress, skip accounting, batching)                │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        DumpSource Trait                             │
//! │            fn iter_lines() -> impl Iterator<DumpLine>               │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Extractor     │ ─▶ │ BridgeAggregator│ ─▶ │   LinkDeriver   │
//! │ - word/lang     │    │ - en → {de},{fa}│    │ - de→en, en→fa  │
//! │ - translations  │    │ - both dump     │    │ - de×fa (fa×de) │
//! │ - skip reasons  │    │   directions    │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                                    │
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │            WordRegistry → EdgeWriter → TranslationStore             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bridge;
pub mod coordinator;
pub mod error_log;
pub mod extract;
pub mod jsonl;
pub mod links;
pub mod progress;
pub mod source;

// Re-export main types
pub use bridge::{BridgeAggregator, BridgeEntry, HeadwordRole};
pub use coordinator::{in_memory_coordinator, ImportCoordinator, ImportCoordinatorBuilder};
pub use error_log::ErrorLog;
pub use extract::{Extractor, HeadwordEntry};
pub use jsonl::JsonlSource;
pub use links::{DerivedLinks, Link, LinkDeriver, LinkKind};
pub use progress::{print_summary, ImportProgress};
pub use source::{DumpFormat, DumpLine, DumpSource, ImportError, ImportStats, SkipReason};
