use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub labels: LabelConfig,
    pub page: PageConfig,
    pub document: DocumentConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub latin: String,
    pub cjk: String,
    pub code: String,
    /// Half-points.
    pub body_size: u32,
    pub code_size: u32,
    pub label_size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            latin: "Consolas".to_string(),
            cjk: "Microsoft JhengHei".to_string(),
            code: "Consolas".to_string(),
            body_size: 22,
            code_size: 19,
            label_size: 18,
        }
    }
}

/// Labels shown on chat turns and callouts, in both preview and export.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelConfig {
    pub user: String,
    pub ai: String,
    pub note: String,
    pub tip: String,
    pub warning: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            user: "User".to_string(),
            ai: "AI".to_string(),
            note: "Note".to_string(),
            tip: "Tip".to_string(),
            warning: "Warning".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentConfig {
    pub title: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "Technical Manuscript".to_string(),
        }
    }
}

impl Config {
    /// The defaults shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, reporting read and parse failures.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from a TOML file, or return defaults if it cannot be used.
    pub fn load(path: &Path) -> Self {
        Self::load_from_path(path).unwrap_or_else(|e| {
            warn!("{e}; using defaults");
            Self::compiled_default()
        })
    }
}
