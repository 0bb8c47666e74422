//! Input validation for configuration values and command arguments
//!
//! Resource services forward input untouched; these checks only guard values
//! the user types at the command line.

use crate::error::CliError;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    if reqwest::Url::parse(url).is_err() {
        return Err(CliError::InvalidArguments(format!("Invalid URL '{}'", url)).into());
    }

    Ok(())
}

/// Validate a local store key
pub fn validate_storage_key(key: &str) -> crate::Result<()> {
    if key.trim().is_empty() {
        return Err(CliError::InvalidArguments("Storage key cannot be empty".to_string()).into());
    }

    if key.chars().any(char::is_control) {
        return Err(CliError::InvalidArguments(format!(
            "Invalid storage key {:?}: control characters are not allowed",
            key
        ))
        .into());
    }

    Ok(())
}
