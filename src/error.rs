use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned {status} for {url}")]
    FeedStatus { status: u16, url: String },

    #[error("Malformed date: {0:?}")]
    MalformedDate(String),

    #[error("Invalid address: {0}")]
    Address(#[from] url::ParseError),

    #[error("Unsupported localization file: {0}")]
    I18nFormat(String),
}
