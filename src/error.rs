// src/error.rs

//! Unified error handling for the opportunity aggregator.

use std::fmt;

use thiserror::Error;

/// Result type alias for aggregator operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for a single remote request.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Remote directory request failed
    #[error("Remote fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Failure classes of a single remote directory request.
///
/// Every variant is recovered by the aggregation layer; none of them reach
/// the presentation layer as a hard failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection could not be established or was dropped
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded the configured bound
    #[error("request timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    /// Non-2xx response
    #[error("unexpected HTTP status {status}")]
    HttpStatus { status: u16 },

    /// Body was not a valid search response
    #[error("malformed response: {0}")]
    Parse(String),

    /// 2xx response carrying zero results
    #[error("remote returned no results")]
    EmptyResult,
}

impl FetchError {
    /// Classify a transport error from the HTTP client.
    pub fn from_transport(error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                after_secs: timeout_secs,
            }
        } else if let Some(status) = error.status() {
            Self::HttpStatus {
                status: status.as_u16(),
            }
        } else if error.is_decode() {
            Self::Parse(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }

    /// Create a parse error from any displayable cause.
    pub fn parse(message: impl fmt::Display) -> Self {
        Self::Parse(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_converts_into_app_error() {
        let err: AppError = FetchError::HttpStatus { status: 503 }.into();
        assert!(matches!(
            err,
            AppError::Fetch(FetchError::HttpStatus { status: 503 })
        ));
        assert_eq!(
            err.to_string(),
            "Remote fetch error: unexpected HTTP status 503"
        );
    }

    #[test]
    fn test_timeout_message_names_bound() {
        let err = FetchError::Timeout { after_secs: 10 };
        assert_eq!(err.to_string(), "request timed out after 10s");
    }
}
