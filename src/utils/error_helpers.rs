use crate::error::{ApiError, StorageError};
use std::io;
use std::path::Path;

/// Helper functions for standardizing error conversions across the codebase.
/// Convert reqwest errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str, timeout_secs: u64) -> ApiError {
    if error.is_timeout() {
        return convert_timeout_error(endpoint, timeout_secs);
    }

    match error.status() {
        Some(status) => ApiError::Http {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            message: error.to_string(),
            body: None,
        },
        None => ApiError::Network {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        },
    }
}

/// Convert timeout errors to ApiError with endpoint context
pub fn convert_timeout_error(endpoint: &str, timeout_secs: u64) -> ApiError {
    ApiError::Timeout {
        timeout_secs,
        endpoint: endpoint.to_string(),
    }
}

/// Convert JSON deserialization errors to ApiError with endpoint context
pub fn convert_json_error(error: serde_json::Error, endpoint: &str) -> ApiError {
    ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: format!("JSON parse error: {}", error),
    }
}

/// Convert IO errors to StorageError with the offending path
pub fn convert_io_error(error: io::Error, path: &Path) -> StorageError {
    StorageError::FileIo {
        path: path.to_string_lossy().to_string(),
        source: error,
    }
}

/// Helper macro for JSON parsing errors
#[macro_export]
macro_rules! map_json_error {
    ($result:expr, $endpoint:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_json_error(e, $endpoint))
    };
}

/// Helper macro for storage I/O errors
#[macro_export]
macro_rules! map_io_error {
    ($result:expr, $path:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_io_error(e, $path))
    };
}
