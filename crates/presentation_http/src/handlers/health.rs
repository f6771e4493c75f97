//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use infrastructure::RefreshStats;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub cache: CacheStatus,
    pub scheduler: SchedulerStatus,
}

/// State of the bulletin cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub populated: bool,
    pub degraded: bool,
    pub age_seconds: Option<i64>,
    pub refreshing: bool,
}

/// State of the background refresh scheduler
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub refresh: Option<RefreshStats>,
}

/// Readiness check - is there a good bulletin to serve?
///
/// Never triggers a refresh.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let entry = state.cache.peek();
    let now = chrono::Utc::now();

    let cache = CacheStatus {
        populated: entry.is_some(),
        degraded: entry.as_ref().is_some_and(|e| e.is_degraded),
        age_seconds: entry.as_ref().map(|e| e.age(now).num_seconds()),
        refreshing: state.cache.is_refreshing(),
    };
    let scheduler = state.scheduler.as_ref().map_or(
        SchedulerStatus {
            running: false,
            refresh: None,
        },
        |s| SchedulerStatus {
            running: s.is_running(),
            refresh: Some(s.stats()),
        },
    );

    let ready = cache.populated && !cache.degraded;
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            cache,
            scheduler,
        }),
    )
}
