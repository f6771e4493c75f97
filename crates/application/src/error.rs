//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors raised by the bulletin pipeline
///
/// Cloneable so one refresh outcome can be handed to every waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplicationError {
    /// Network failure, timeout or non-2xx answer from the data source
    #[error("Upstream error: {message}")]
    Upstream {
        /// Human-readable cause
        message: String,
        /// HTTP status, when the upstream answered at all
        status: Option<u16>,
        /// Response body, when the upstream answered at all
        body: Option<String>,
    },

    /// Missing or malformed payload fields
    #[error("Parse error: {0}")]
    Parse(String),

    /// No station matched the configured keywords
    #[error("Not found: {0}")]
    NotFound(String),

    /// No timestamp candidate could be parsed
    #[error("Timestamp error: {0}")]
    Timestamp(String),

    /// Source data too old or dated in the future
    #[error("Stale data: {0}")]
    StaleData(String),

    /// Required configuration (e.g. credential) is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Upstream HTTP status, if the failure came with one
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Upstream response body, if the failure came with one
    #[must_use]
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            Self::Upstream { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Whether the failure came from the data pipeline rather than from
    /// this service's own setup
    #[must_use]
    pub const fn is_pipeline_failure(&self) -> bool {
        !matches!(self, Self::Configuration(_) | Self::Internal(_))
    }

    /// Stable machine-readable kind for logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "upstream",
            Self::Parse(_) => "parse",
            Self::NotFound(_) => "not_found",
            Self::Timestamp(_) => "timestamp",
            Self::StaleData(_) => "stale_data",
            Self::Configuration(_) => "configuration",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        Self::Configuration(err.to_string())
    }
}
