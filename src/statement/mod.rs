pub mod date;
pub mod feed;

use serde::{Deserialize, Serialize};

use crate::i18n::I18n;
use date::{compute_date_number, compute_formatted_date};

/// A link backing a statement. The domain is extracted during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    #[serde(default)]
    pub domain: String,
}

/// A statement as delivered by the feed, before the date fields are derived.
/// Only `id` is required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawStatement {
    pub id: u64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub person: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A normalized statement. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub id: u64,
    pub date: String,
    pub date_number: u64,
    pub date_formatted: String,
    pub person: String,
    pub position: String,
    pub sector: String,
    pub details: String,
    pub themes: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub permalink: String,
    pub sources: Vec<Source>,
}

/// Derive the sortable and display dates for one raw statement.
pub fn normalize(raw: RawStatement, i18n: &I18n) -> Statement {
    let date_number = compute_date_number(&raw.date);
    let date_formatted = compute_formatted_date(&raw.date, i18n);
    Statement {
        id: raw.id,
        date: raw.date,
        date_number,
        date_formatted,
        person: raw.person,
        position: raw.position,
        sector: raw.sector,
        details: raw.details,
        themes: raw.themes,
        permalink: raw.permalink,
        sources: raw.sources,
    }
}

pub fn normalize_all(raws: Vec<RawStatement>, i18n: &I18n) -> Vec<Statement> {
    raws.into_iter().map(|raw| normalize(raw, i18n)).collect()
}
