//! Configuration for lexbridge

mod import;
mod logging;
mod store;

pub use import::{BridgeLanguages, ImportConfig, DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use store::StoreConfig;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "lexbridge.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Import pipeline configuration
    #[serde(default)]
    pub import: ImportConfig,
    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Missing sections and fields fall back to their defaults. The result is
    /// validated before it is returned.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without validating it, so command-line overrides
    /// can be applied first
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))
    }

    /// Parse `path` if it exists, otherwise start from defaults. Not validated.
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate all configuration fields.
    ///
    /// Collects every problem and reports them together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.import.batch_size == 0 {
            errors.push("batch_size must be positive".to_string());
        }
        if self.import.batch_size > MAX_BATCH_SIZE {
            errors.push(format!("batch_size must be <= {}", MAX_BATCH_SIZE));
        }
        if self.import.max_records == Some(0) {
            errors.push("max_records must be positive when set".to_string());
        }

        let langs = &self.import.languages;
        for (name, code) in [
            ("bridge", &langs.bridge),
            ("source", &langs.source),
            ("target", &langs.target),
        ] {
            if code.trim().is_empty() {
                errors.push(format!("{} language code must not be empty", name));
            }
        }
        if langs.bridge == langs.source || langs.bridge == langs.target || langs.source == langs.target {
            errors.push(format!(
                "bridge, source and target languages must be distinct (got {}, {}, {})",
                langs.bridge, langs.source, langs.target
            ));
        }

        // The store is never opened in a dry run
        if !self.import.dry_run {
            let database = &self.store.database;
            if database.as_os_str().is_empty() {
                errors.push("store database path must not be empty".to_string());
            } else if let Some(parent) = database.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    errors.push(format!(
                        "store database directory '{}' does not exist",
                        parent.display()
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}
