use anyhow::Result;
use lexbridge::config::{Config, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;

pub fn init_config(path: PathBuf, force: bool) -> Result<()> {
    let config = Config::default();
    let config_path = path.join(DEFAULT_CONFIG_FILE);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let toml_content = format!(
        r#"# lexbridge configuration

[import]
# Wiktextract JSONL dump, optionally .bz2 compressed
input = "{}"
# Rows per insert statement (1-10000)
batch_size = {}
dry_run = false
# Also write Persian -> German links
symmetric = {}
lowercase_words = {}
# max_records = 100000
# error_log = "import_error_summary.txt"

[import.languages]
bridge = "{}"
source = "{}"
target = "{}"

[store]
database = "{}"
busy_timeout_ms = {}

[logging]
# text or json
format = "text"
# error, warn, info, debug, trace (RUST_LOG overrides)
level = "{}"
"#,
        config.import.input.display(),
        config.import.batch_size,
        config.import.symmetric,
        config.import.lowercase_words,
        config.import.languages.bridge,
        config.import.languages.source,
        config.import.languages.target,
        config.store.database.display(),
        config.store.busy_timeout_ms,
        config.logging.level,
    );

    std::fs::create_dir_all(&path)?;
    std::fs::write(&config_path, toml_content)?;
    println!("Created configuration file: {}", config_path.display());

    Ok(())
}
