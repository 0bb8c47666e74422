//! Error normalization
//!
//! Collapses any failure into one `{status, message, data}` shape so the
//! presentation layer never branches on error type. Applied by callers, not by
//! the resource services themselves.

use crate::error::{ApiError, AppError};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub const DEFAULT_STATUS: u16 = 500;
const FALLBACK_MESSAGE: &str = "Unexpected error";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl NormalizedError {
    pub fn from_api_error(error: &ApiError) -> Self {
        let data = error.body().cloned();
        let status = error.status().unwrap_or(DEFAULT_STATUS);

        let message = data
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| own_message(error));

        Self {
            status,
            message: non_empty(message),
            data,
        }
    }

    pub fn from_app_error(error: &AppError) -> Self {
        match error {
            AppError::Api(api_error) => Self::from_api_error(api_error),
            other => Self {
                status: DEFAULT_STATUS,
                message: non_empty(other.display_friendly()),
                data: None,
            },
        }
    }
}

/// Convert any application failure into a [`NormalizedError`]. Never fails.
pub fn normalize(error: &AppError) -> NormalizedError {
    NormalizedError::from_app_error(error)
}

impl From<&ApiError> for NormalizedError {
    fn from(error: &ApiError) -> Self {
        Self::from_api_error(error)
    }
}

impl From<&AppError> for NormalizedError {
    fn from(error: &AppError) -> Self {
        Self::from_app_error(error)
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

fn own_message(error: &ApiError) -> String {
    match error {
        ApiError::Http { message, .. } => message.clone(),
        ApiError::Unauthorized { server_message, .. } => server_message.clone(),
        other => other.to_string(),
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}
