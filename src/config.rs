//! Configuration
//!
//! Optional TOML file with defaults for the CLI. Looked up at
//! `<config dir>/casemap/config.toml` unless a path is given explicitly.
//! Command-line flags override whatever the file says.

use crate::scale::PaletteName;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Dataset JSON to use instead of the bundled one.
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub service: ServiceConfig,
}

/// Choropleth defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub palette: PaletteName,

    #[serde(default = "default_hotspot")]
    pub hotspot: bool,
}

fn default_hotspot() -> bool {
    true
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            palette: PaletteName::default(),
            hotspot: default_hotspot(),
        }
    }
}

/// Chart output defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            locale: default_locale(),
        }
    }
}

/// Forecast service endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Default location: `<config dir>/casemap/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("casemap").join("config.toml"))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse config")
    }

    /// Read a config file. The file must exist.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("in {}", path.display()))
    }

    /// Load `explicit` if given (must exist), else the default path if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::from_file(p);
        }
        match Self::default_path() {
            Some(p) if p.is_file() => {
                log::debug!("using config {}", p.display());
                Self::from_file(p)
            }
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let c = Config::from_toml_str("").unwrap();
        assert_eq!(c, Config::default());
        assert!(c.map.hotspot);
        assert_eq!(c.chart.width, 1000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let c = Config::from_toml_str(
            r#"
            dataset = "/tmp/cases.json"

            [map]
            palette = "reds"

            [chart]
            locale = "de"
            "#,
        )
        .unwrap();
        assert_eq!(c.dataset, Some(PathBuf::from("/tmp/cases.json")));
        assert_eq!(c.map.palette, PaletteName::Reds);
        assert!(c.map.hotspot);
        assert_eq!(c.chart.locale, "de");
        assert_eq!(c.chart.height, 600);
    }

    #[test]
    fn unknown_palette_is_rejected() {
        assert!(Config::from_toml_str("[map]\npalette = \"blues\"").is_err());
    }
}
