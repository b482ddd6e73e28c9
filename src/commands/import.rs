use anyhow::{Context, Result};
use clap::Args;
use lexbridge::{
    config::Config,
    import::{DumpFormat, ImportCoordinatorBuilder, JsonlSource},
};
use std::path::PathBuf;
use tracing::info;

/// Command-line overrides for `lexbridge import`
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to the Wiktextract JSONL dump (.jsonl or .jsonl.bz2)
    pub path: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Rows per insert batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Compute everything but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after this many records
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Write skipped records to this file
    #[arg(long)]
    pub error_log: Option<PathBuf>,

    /// Only write German to Persian links, not the reverse
    #[arg(long)]
    pub no_symmetric: bool,

    /// Lowercase every word before storing it
    #[arg(long)]
    pub lowercase: bool,

    /// Quiet mode (no progress output)
    #[arg(short, long)]
    pub quiet: bool,
}

impl ImportArgs {
    fn apply(&self, config: &mut Config) {
        let import = &mut config.import;
        if let Some(ref path) = self.path {
            import.input = path.clone();
        }
        if let Some(batch_size) = self.batch_size {
            import.batch_size = batch_size;
        }
        if let Some(max) = self.max_records {
            import.max_records = Some(max);
        }
        if let Some(ref log) = self.error_log {
            import.error_log = Some(log.clone());
        }
        import.dry_run |= self.dry_run;
        import.lowercase_words |= self.lowercase;
        if self.no_symmetric {
            import.symmetric = false;
        }
        if let Some(ref db) = self.db {
            config.store.database = db.clone();
        }
    }
}

pub fn import_dump(mut config: Config, args: ImportArgs) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let path = config.import.input.clone();
    if !path.is_file() {
        anyhow::bail!("Dump file not found: {}", path.display());
    }

    let format = DumpFormat::detect(&path).unwrap_or(DumpFormat::JsonLines);
    info!("Importing from: {} (format: {:?})", path.display(), format);
    if config.import.dry_run {
        info!("Dry run: no rows will be written");
    } else {
        info!("Writing to: {}", config.store.database.display());
    }

    let source = JsonlSource::open_as(&path, format)
        .with_context(|| format!("Failed to open dump: {}", path.display()))?;

    let mut coordinator = ImportCoordinatorBuilder::new()
        .with_config(config.import.clone())
        .with_store_config(config.store.clone())
        .with_quiet(args.quiet)
        .build()
        .context("Failed to set up import")?;

    let stats = coordinator.import(source).context("Import failed")?;

    if let Some(ref log) = config.import.error_log {
        if stats.records_skipped > 0 && !args.quiet {
            println!(
                "\n{} skipped records written to {}",
                stats.records_skipped,
                log.display()
            );
        }
    }

    Ok(())
}
