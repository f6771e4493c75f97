//! API error handling
//!
//! A failed forced refresh is reported as JSON carrying the upstream status
//! and body, so operators can see what the weather service answered.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// The weather pipeline failed (upstream, payload, station, freshness)
    #[error("Bulletin refresh failed: {0}")]
    Pipeline(ApplicationError),

    /// The service itself is misconfigured or broken
    #[error("Internal error: {0}")]
    Internal(ApplicationError),
}

/// Body of every `/refresh` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// Whether a new bulletin was stored
    pub ok: bool,
    /// Success message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// HTTP status returned by the weather service, if it answered
    pub upstream_status: Option<u16>,
    /// Body returned by the weather service: JSON when it parses, else text
    pub upstream_body: Option<Value>,
}

impl RefreshResponse {
    /// Successful refresh
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            error: None,
            upstream_status: None,
            upstream_body: None,
        }
    }

    /// Failed refresh
    #[must_use]
    pub fn failure(err: &ApplicationError) -> Self {
        Self {
            ok: false,
            message: None,
            error: Some(err.to_string()),
            upstream_status: err.upstream_status(),
            upstream_body: err.upstream_body().map(parse_body),
        }
    }
}

/// Upstream body as JSON if it parses, otherwise as a JSON string
fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Pipeline(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (Self::Pipeline(err) | Self::Internal(err)) = &self;
        (status, Json(RefreshResponse::failure(err))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        if err.is_pipeline_failure() {
            Self::Pipeline(err)
        } else {
            Self::Internal(err)
        }
    }
}
