use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Display labels for the static catalogs and the date renderer.
///
/// Keys mirror the label file shipped with the site, so a file may set any
/// subset and the rest falls back to English.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18n {
    pub locale: String,
    pub no_date: String,

    pub civilian_harm: String,
    pub starvation: String,
    pub destruction_infrastructure: String,
    pub annexation_displacement: String,

    pub armed_forces: String,
    pub decision_makers: String,
    pub legislators: String,
    pub public_figures: String,
    pub former_government: String,
    pub media: String,
    pub other: String,
}

impl Default for I18n {
    fn default() -> Self {
        Self {
            locale: "en-GB".to_string(),
            no_date: "No date".to_string(),
            civilian_harm: "Civilian harm".to_string(),
            starvation: "Starvation".to_string(),
            destruction_infrastructure: "Destruction of infrastructure".to_string(),
            annexation_displacement: "Annexation & displacement".to_string(),
            armed_forces: "Armed forces".to_string(),
            decision_makers: "Decision makers".to_string(),
            legislators: "Legislators".to_string(),
            public_figures: "Public figures".to_string(),
            former_government: "Former government".to_string(),
            media: "Media".to_string(),
            other: "Other".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LabelFormat {
    Json,
    Yaml,
    Toml,
}

impl LabelFormat {
    fn detect(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(LabelFormat::Json),
            Some("yaml" | "yml") => Some(LabelFormat::Yaml),
            Some("toml") => Some(LabelFormat::Toml),
            _ => None,
        }
    }
}

impl I18n {
    /// Load labels from a JSON, YAML or TOML file, picked by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = LabelFormat::detect(path)
            .ok_or_else(|| Error::I18nFormat(path.display().to_string()))?;
        let content = std::fs::read_to_string(path)?;
        let i18n = match format {
            LabelFormat::Json => serde_json::from_str(&content)?,
            LabelFormat::Yaml => serde_yaml::from_str(&content)?,
            LabelFormat::Toml => toml::from_str(&content)?,
        };
        debug!("Loaded labels from {}", path.display());
        Ok(i18n)
    }

    /// Locale for chrono's localized formatting. `en-GB` becomes `en_GB`;
    /// unknown identifiers fall back to POSIX.
    pub fn chrono_locale(&self) -> chrono::Locale {
        let normalized = self.locale.trim().replace('-', "_");
        chrono::Locale::try_from(normalized.as_str()).unwrap_or(chrono::Locale::POSIX)
    }
}
