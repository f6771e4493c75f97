//! Weather fetcher error types

use thiserror::Error;

/// Longest upstream body kept in an error, in characters
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 2048;

/// Errors that can occur while fetching weather data
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WeatherError {
    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {status}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// Request could not be completed (DNS, connect, TLS, reset)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Payload was not valid JSON or lacked expected fields
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No station in the feed matched the configured keywords
    #[error("No station matched keywords: {0}")]
    StationNotFound(String),

    /// Client is missing required configuration (e.g. credential)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl WeatherError {
    /// Build an upstream error, truncating oversized bodies
    pub(crate) fn upstream(status: u16, body: &str) -> Self {
        Self::Upstream {
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }

    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            Self::RequestFailed(_) | Self::Timeout { .. } => true,
            Self::ParseError(_) | Self::StationNotFound(_) | Self::ConfigurationError(_) => false,
        }
    }
}
