//! Configuration service for managing application configuration

use crate::AppError;
use crate::error::ConfigError;
use crate::storage::config::Config;
use crate::utils::validation::validate_url;
use std::path::PathBuf;

pub struct ConfigService {
    config: Config,
}

impl ConfigService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn get_url(&self) -> Option<String> {
        self.config.get_url()
    }

    /// Backend URL, or an error pointing at how to configure it
    pub fn require_url(&self) -> Result<String, AppError> {
        self.get_url().ok_or_else(|| {
            AppError::Config(ConfigError::MissingField {
                field: "url".to_string(),
                hint: "Use 'rollcall config set --url <url>' or set ROLLCALL_URL".to_string(),
            })
        })
    }

    pub fn set_url(&mut self, url: String) -> Result<(), AppError> {
        validate_url(&url)?;
        self.config.set_url(url);
        Ok(())
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<(), AppError> {
        if seconds == 0 {
            return Err(AppError::Config(ConfigError::InvalidValue {
                field: "timeout_seconds".to_string(),
                value: seconds.to_string(),
                reason: "must be greater than zero".to_string(),
            }));
        }
        self.config.timeout_seconds = Some(seconds);
        Ok(())
    }

    pub fn set_storage_path(&mut self, path: PathBuf) {
        self.config.storage_path = Some(path);
    }

    pub fn save_config(&self, path: Option<PathBuf>) -> Result<(), AppError> {
        self.config.save(path).map_err(|e| e.into())
    }
}
