use anyhow::Result;
use serde::Serialize;

use crate::filters::FilterOption;
use crate::statement::Statement;

/// Machine-readable result of `statements list`.
#[derive(Debug, Serialize)]
pub struct ListOutput<'a> {
    pub address: String,
    pub query: String,
    pub total: usize,
    pub shown: usize,
    pub statements: Vec<&'a Statement>,
}

/// Machine-readable catalog listing.
#[derive(Debug, Serialize)]
pub struct OptionsOutput<'a> {
    pub category: &'static str,
    pub options: &'a [FilterOption],
}

/// Pretty-print any serializable value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
