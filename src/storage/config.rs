//! Configuration management
//!
//! Backend URL, request timeout and store location live in `config.toml`.
//! Priority: CLI argument > ROLLCALL_URL environment variable > config.toml

use super::Result;
use crate::api::client::DEFAULT_TIMEOUT_SECS;
use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const URL_ENV_VAR: &str = "ROLLCALL_URL";

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Backend base URL, e.g. `https://api.example.test/v1`
    pub url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Location of the local key-value store document
    pub storage_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            log::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(home_dir.join(".config").join("rollcall").join("config.toml"))
    }

    /// Get URL with fallback to environment variable
    pub fn get_url(&self) -> Option<String> {
        self.url
            .clone()
            .or_else(|| std::env::var(URL_ENV_VAR).ok().filter(|s| !s.is_empty()))
    }

    pub fn set_url(&mut self, url: String) {
        self.url = Some(url);
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}
