use std::path::PathBuf;
use tracing::{info, warn};

use super::{normalize_all, RawStatement, Statement};
use crate::error::{Error, Result};
use crate::i18n::I18n;

/// Somewhere the published `statements.json` can be read from.
pub trait StatementFeed {
    /// Human-readable location, used in logs.
    fn location(&self) -> String;

    /// Fetch and parse the raw records.
    fn fetch(&self) -> Result<Vec<RawStatement>>;
}

pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatementFeed for FileFeed {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<RawStatement>> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

pub struct HttpFeed {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl StatementFeed for HttpFeed {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<RawStatement>> {
        let resp = self.client.get(&self.url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::FeedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pick a feed for a CLI/config location: `http(s)://` URLs go over the
/// network, anything else is a file path.
pub fn feed_for(location: &str) -> Box<dyn StatementFeed> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpFeed::new(location))
    } else {
        Box::new(FileFeed::new(location))
    }
}

/// Fetch and normalize statements. Any failure is logged and yields an
/// empty list; loading always completes.
pub fn load_statements(feed: &dyn StatementFeed, i18n: &I18n) -> Vec<Statement> {
    match feed.fetch() {
        Ok(raws) => {
            info!("Loaded {} statements from {}", raws.len(), feed.location());
            normalize_all(raws, i18n)
        }
        Err(err) => {
            warn!("Failed to load statements from {}: {err}", feed.location());
            Vec::new()
        }
    }
}
