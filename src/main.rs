//! lexbridge: German-Persian translation links from Wiktextract dumps

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::import::ImportArgs;
use lexbridge::config::{Config, LogFormat, LogLevel, LoggingConfig, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "lexbridge")]
#[command(about = "Derive German-Persian translations from Wiktextract dumps via English")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbosity level (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a Wiktextract dump into the translation store
    Import(ImportArgs),

    /// Write a default configuration file
    Init {
        /// Output directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Show word and translation counts
    Stats {
        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { path, force } = cli.command {
        init_logging(&LoggingConfig::default(), cli.log_level, cli.verbose, cli.json_logs)?;
        return commands::init::init_config(path, force);
    }

    let config = Config::from_file_or_default(&cli.config)?;
    init_logging(&config.logging, cli.log_level, cli.verbose, cli.json_logs)?;
    debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Commands::Import(args) => commands::import::import_dump(config, args),
        Commands::Stats { db } => commands::stats::show_stats(config, db),
        Commands::Init { .. } => Ok(()),
    }
}

/// Install the global subscriber. Logs go to stderr so the summary on stdout
/// stays clean; `RUST_LOG` takes precedence over every other setting.
fn init_logging(
    logging: &LoggingConfig,
    level: Option<LogLevel>,
    verbose: u8,
    json: bool,
) -> Result<()> {
    let level = level.unwrap_or(logging.level).bumped(verbose);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json || logging.format == LogFormat::Json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
