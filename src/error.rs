//! Error types for the insights API gateway.
//!
//! Every gateway failure is normalized into one of three kinds so the
//! dashboard can show a single message and offer a retry.

use thiserror::Error;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Unable to connect to the server";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request or its body never arrived (refused, DNS, timeout, dropped).
    #[error("Network error: Unable to connect to the server")]
    Network,

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// Anything else, e.g. a body that does not match the expected shape.
    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        ApiError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() || err.is_builder() {
            ApiError::Unknown(err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            ApiError::Network
        } else {
            ApiError::Unknown(err.to_string())
        }
    }
}

/// Tauri commands require errors to implement `Into<String>`.
impl From<ApiError> for String {
    fn from(err: ApiError) -> Self {
        err.to_string()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}
