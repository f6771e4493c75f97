//! Voice document handler

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, header},
    response::IntoResponse,
};
use tracing::{debug, instrument};

use crate::state::AppState;

/// Header telling the caller whether the document is the apology fallback
pub const DEGRADED_HEADER: &str = "x-bulletin-degraded";

/// Serve the cached bulletin, refreshing first when missing or expired
///
/// Always answers 200 with a document; failures surface as a degraded one.
#[instrument(skip(state))]
pub async fn voice_document(State(state): State<AppState>) -> impl IntoResponse {
    let entry = state.cache.read().await;
    debug!(
        degraded = entry.is_degraded,
        created_at = %entry.created_at,
        "Serving bulletin"
    );

    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(state.cache.content_type()),
            ),
            (
                HeaderName::from_static(DEGRADED_HEADER),
                HeaderValue::from_static(if entry.is_degraded { "true" } else { "false" }),
            ),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
        entry.rendered_payload.clone(),
    )
}
