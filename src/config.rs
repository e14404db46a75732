use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Failures loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Process settings, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub port: u16,
    pub database_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 9090,
            database_url: String::new(),
        }
    }
}

impl Settings {
    /// Reads settings from the JSON file at `path`. Absent fields keep
    /// their defaults.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
