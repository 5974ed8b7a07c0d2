use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::filter::DEFAULT_THUMBNAIL_WIDTH;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub catalog: CatalogConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_toml_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let parsed: Self =
            toml::from_str(&raw).with_context(|| format!("invalid TOML in {}", path.display()))?;
        Ok(parsed)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub sparql_url: String,
    pub user_agent: String,
    pub language: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            sparql_url: "https://query.wikidata.org/sparql".to_owned(),
            user_agent: concat!("fediscope/", env!("CARGO_PKG_VERSION")).to_owned(),
            language: "en".to_owned(),
            connect_timeout_secs: 15,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
    pub default_label: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/professions.json"),
            default_label: "journalist".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub csv_path: PathBuf,
    pub html_path: Option<PathBuf>,
    pub thumbnail_width: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(crate::export::CSV_FILE_NAME),
            html_path: None,
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.endpoint.sparql_url, "https://query.wikidata.org/sparql");
        assert_eq!(config.catalog.default_label, "journalist");
        assert_eq!(config.export.csv_path, PathBuf::from("profiles.csv"));
        assert_eq!(config.export.thumbnail_width, 250);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config: Config = toml::from_str(
            r#"
[endpoint]
language = "de"

[export]
html_path = "out/report.html"
"#,
        )
        .unwrap();

        assert_eq!(config.endpoint.language, "de");
        assert_eq!(config.endpoint.timeout_secs, 60);
        assert_eq!(
            config.export.html_path,
            Some(PathBuf::from("out/report.html"))
        );
        assert_eq!(config.logging.level, "info");
    }
}
