//! Forced refresh handler

use axum::{Json, extract::State};
use tracing::{info, instrument};

use crate::{
    error::{ApiError, RefreshResponse},
    state::AppState,
};

/// Run the pipeline now, joining any refresh already in flight
///
/// # Errors
///
/// Returns 502 for weather pipeline failures and 500 for configuration or
/// internal failures, with the upstream status and body when available.
#[instrument(skip(state))]
pub async fn force_refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    let entry = state.cache.refresh().await?;
    info!(created_at = %entry.created_at, "Forced refresh succeeded");
    Ok(Json(RefreshResponse::success("Bulletin refreshed")))
}
