use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("ServiceError: {0}")]
    Service(#[from] ServiceError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Failures raised by the transport client.
///
/// `Http` and `Unauthorized` keep the parsed response body (when the server sent
/// JSON) so the error normalizer can surface the backend's own message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("Network error: {message}")]
    Network { endpoint: String, message: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
        body: Option<serde_json::Value>,
    },
    #[error("Authentication failed")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
        body: Option<serde_json::Value>,
    },
    #[error("Malformed response: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// HTTP status carried by the failure, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Unauthorized { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body carried by the failure, if the server sent JSON.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Http { body, .. } | ApiError::Unauthorized { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Timeout { endpoint, .. }
            | ApiError::Network { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Unauthorized { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Serialization failed for key '{key}': {message}")]
    Serialize { key: String, message: String },
    #[error("Stored value for key '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
    #[error("Data directory not found")]
    DataDirNotFound,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration field '{field}' is missing")]
    MissingField { field: String, hint: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Session service error: {message}")]
    Session { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    High,
    Medium,
}

impl ErrorSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorSeverity::High => "error",
            ErrorSeverity::Medium => "warning",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } => ErrorSeverity::High,
                ApiError::Timeout { .. } | ApiError::Network { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                ApiError::Decode { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(StorageError::Corrupt { .. }) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Service(_) => ErrorSeverity::Medium,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Api(ApiError::Unauthorized { .. }) => {
                "Access token rejected by the server".to_string()
            }
            AppError::Config(ConfigError::MissingField { field, .. }) => {
                format!("'{}' is not configured", field)
            }
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(ApiError::Unauthorized { .. }) => {
                Some("Set ROLLCALL_ACCESS_TOKEN or pass --access-token".to_string())
            }
            AppError::Config(ConfigError::MissingField { hint, .. }) => Some(hint.clone()),
            AppError::Api(ApiError::Timeout { .. } | ApiError::Network { .. }) => {
                Some("Check your network connection and try again (or use --retry)".to_string())
            }
            _ => None,
        }
    }
}
