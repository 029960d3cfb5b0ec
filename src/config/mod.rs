use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::selection::debounce::SEARCH_DEBOUNCE;

/// Environment variable naming the statement feed.
pub const FEED_ENV: &str = "STATEMENTS_FEED";

/// Top-level config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct StatementsConfig {
    /// Path or http(s) URL of `statements.json`.
    pub feed: Option<String>,
    /// Label file (JSON, YAML or TOML).
    pub i18n: Option<PathBuf>,
    /// Search debounce window in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Address the CLI starts from when none is given.
    pub base_address: Option<String>,
}

impl StatementsConfig {
    /// Load config from `path`, or ~/.statements/config.toml. Returns default
    /// if the file doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };
        if !path.exists() {
            return Ok(StatementsConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: StatementsConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce_ms.map(Duration::from_millis).unwrap_or(SEARCH_DEBOUNCE)
    }

    pub fn display(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref feed) = self.feed {
            lines.push(format!("feed = \"{}\"", feed));
        }
        if let Some(ref i18n) = self.i18n {
            lines.push(format!("i18n = \"{}\"", i18n.display()));
        }
        if let Some(ms) = self.debounce_ms {
            lines.push(format!("debounce_ms = {ms}"));
        }
        if let Some(ref base) = self.base_address {
            lines.push(format!("base_address = \"{}\"", base));
        }
        if lines.is_empty() {
            lines.push("(defaults)".to_string());
        }
        lines.join("\n")
    }
}

/// Resolve the feed location through the chain: CLI flag > env var > config.
pub fn resolve_feed(cli_flag: Option<&str>, config: &StatementsConfig) -> Result<String> {
    resolve_feed_with(cli_flag, std::env::var(FEED_ENV).ok().as_deref(), config)
}

fn resolve_feed_with(
    cli_flag: Option<&str>,
    env_value: Option<&str>,
    config: &StatementsConfig,
) -> Result<String> {
    let candidates = [cli_flag, env_value, config.feed.as_deref()];
    if let Some(feed) = candidates.into_iter().flatten().map(str::trim).find(|f| !f.is_empty()) {
        return Ok(feed.to_string());
    }

    bail!(
        "No statement feed configured. Provide via --feed, {} env var, or ~/.statements/config.toml",
        FEED_ENV
    );
}

/// Path to the config file: ~/.statements/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".statements").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.statements/config.toml
# Feed resolution order: --feed > STATEMENTS_FEED > feed

# feed = "https://example.org/statements.json"
# i18n = "/path/to/labels.json"
# debounce_ms = 250
# base_address = "https://example.org/"
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}
