//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-config.toml file.
//! It names the site to scrape, the year to chart, and how the chart is drawn.
//! Every field is optional in the file; anything left out takes its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "tide-config.toml";

/// Application configuration loaded from tide-config.toml
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Where the tide tables are published
    pub source: SourceConfig,
    /// Chart output settings
    pub chart: ChartConfig,
}

/// Tide table source
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Site root, prepended verbatim to the index path and to the scraped href
    pub base_url: String,
    /// Year whose link text is looked up on the index page
    pub year: i32,
    /// Path of the index page listing one link per year
    pub index_path: String,
}

/// Chart rendering configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Font family for the title, axis descriptions and tick labels.
    /// Set to a CJK-capable family (e.g. "SimHei") when labels need it.
    pub font_family: String,
    /// Figure width in pixels
    pub width: u32,
    /// Figure height in pixels
    pub height: u32,
    /// Where the SVG chart is written
    pub output: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            base_url: "https://www.hko.gov.hk".to_string(),
            year: 2026,
            index_path: "/en/tide/ttext.htm".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            font_family: "sans-serif".to_string(),
            width: 1000,
            height: 600,
            output: PathBuf::from("tide-chart.svg"),
        }
    }
}

impl SourceConfig {
    /// Absolute URL of the index page.
    pub fn index_url(&self) -> String {
        format!("{}{}", self.base_url, self.index_path)
    }
}

impl Config {
    /// Build a configuration for `base_url` and `year`, defaulting everything else.
    pub fn new(base_url: impl Into<String>, year: i32) -> Self {
        Config {
            source: SourceConfig {
                base_url: base_url.into(),
                year,
                ..SourceConfig::default()
            },
            chart: ChartConfig::default(),
        }
    }

    /// Load configuration from tide-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        base_url = %config.source.base_url,
                        year = config.source.year,
                        "loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file format, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.base_url, "https://www.hko.gov.hk");
        assert_eq!(config.source.year, 2026);
        assert_eq!(config.source.index_path, "/en/tide/ttext.htm");
        assert_eq!(config.chart.font_family, "sans-serif");
        assert_eq!(config.chart.output, PathBuf::from("tide-chart.svg"));
    }

    #[test]
    fn test_new_sets_source() {
        let config = Config::new("https://x.test", 1999);
        assert_eq!(config.source.base_url, "https://x.test");
        assert_eq!(config.source.year, 1999);
        assert_eq!(config.source.index_url(), "https://x.test/en/tide/ttext.htm");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::new("https://x.test", 2030);
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.source.base_url, parsed.source.base_url);
        assert_eq!(config.source.year, parsed.source.year);
        assert_eq!(config.chart.width, parsed.chart.width);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[source]\nyear = 2027\n\n[chart]\nfont_family = \"SimHei\"").unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.source.year, 2027);
        assert_eq!(config.source.base_url, "https://www.hko.gov.hk");
        assert_eq!(config.chart.font_family, "SimHei");
        assert_eq!(config.chart.height, 600);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[source\nyear = ").unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.source.year, 2026);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.source.base_url, "https://www.hko.gov.hk");
    }
}
