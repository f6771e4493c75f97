//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use application::{
    ApplicationError, BulletinCache, BulletinService, WeatherPort, fixed_clock,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use domain::{RawObservation, WeatherCode, WeatherSnapshot};
use infrastructure::{
    AppConfig, RefreshScheduler, VoiceDocumentRenderer, create_bulletin_refresh_task,
};
use presentation_http::{routes::create_router, state::AppState};
use serde_json::{Value, json};

/// Weather source whose next answer can be swapped between requests
struct ScriptedWeather {
    outcome: Mutex<Result<WeatherSnapshot, ApplicationError>>,
}

impl ScriptedWeather {
    fn new(outcome: Result<WeatherSnapshot, ApplicationError>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(outcome),
        })
    }

    fn set(&self, outcome: Result<WeatherSnapshot, ApplicationError>) {
        *self.outcome.lock().unwrap() = outcome;
    }
}

#[async_trait]
impl WeatherPort for ScriptedWeather {
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, ApplicationError> {
        self.outcome.lock().unwrap().clone()
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

fn good_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        source_name: None,
        observation: Some(RawObservation {
            temperature: Some(21.3),
            apparent_temperature: Some(20.1),
            humidity: Some(40.0),
            weather_code: Some(WeatherCode::new(0)),
            source_timestamps: vec!["2024-05-15T14:15:00+02:00".to_string()],
        }),
        hourly: Vec::new(),
    }
}

fn upstream_failure() -> ApplicationError {
    ApplicationError::Upstream {
        message: "weather service returned HTTP 503".into(),
        status: Some(503),
        body: Some(r#"{"reason":"maintenance"}"#.into()),
    }
}

fn create_state(weather: Arc<ScriptedWeather>) -> AppState {
    let config = AppConfig::default();
    let timezone = config.weather.timezone().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 30, 0).unwrap();
    let service = BulletinService::new(weather, config.bulletin.to_settings(timezone))
        .with_clock(fixed_clock(now));
    let cache = BulletinCache::new(
        service,
        Arc::new(VoiceDocumentRenderer::new(config.bulletin.language.clone())),
        config.bulletin.cache_ttl(),
    );

    AppState::new(Arc::new(cache), Arc::new(config))
}

fn create_test_server(weather: Arc<ScriptedWeather>) -> TestServer {
    TestServer::new(create_router(create_state(weather))).expect("Failed to create test server")
}

// ============================================================================
// Health and readiness
// ============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let server = create_test_server(ScriptedWeather::new(Ok(good_snapshot())));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn ready_is_unavailable_until_populated() {
    let server = create_test_server(ScriptedWeather::new(Ok(good_snapshot())));

    let response = server.get("/ready").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["ready"], false);
    assert_eq!(body["cache"]["populated"], false);
    assert!(body["cache"]["age_seconds"].is_null());

    server.post("/refresh").await.assert_status_ok();

    let response = server.get("/ready").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ready"], true);
    assert_eq!(body["cache"]["degraded"], false);
    assert_eq!(body["scheduler"]["running"], false);
}

#[tokio::test]
async fn ready_reports_scheduled_refresh_runs() {
    let state = create_state(ScriptedWeather::new(Ok(good_snapshot())));
    let scheduler = Arc::new(
        RefreshScheduler::new(
            "* * * * * *",
            create_bulletin_refresh_task(Arc::clone(&state.cache)),
        )
        .await
        .unwrap(),
    );
    scheduler.start().await.unwrap();
    let server = TestServer::new(create_router(state.with_scheduler(Arc::clone(&scheduler))))
        .expect("Failed to create test server");

    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;

    let response = server.get("/ready").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["scheduler"]["running"], true);
    assert_eq!(body["scheduler"]["refresh"]["cron"], "* * * * * *");
    assert!(body["scheduler"]["refresh"]["runs"].as_u64().unwrap() >= 1);
    assert_eq!(body["scheduler"]["refresh"]["failures"], 0);

    scheduler.stop().await.unwrap();
}

#[tokio::test]
async fn ready_is_unavailable_when_degraded() {
    let server = create_test_server(ScriptedWeather::new(Err(upstream_failure())));

    server.get("/voice").await.assert_status_ok();

    let response = server.get("/ready").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["cache"]["populated"], true);
    assert_eq!(body["cache"]["degraded"], true);
}

// ============================================================================
// Voice document
// ============================================================================

#[tokio::test]
async fn voice_serves_bulletin_document() {
    let server = create_test_server(ScriptedWeather::new(Ok(good_snapshot())));

    let response = server.get("/voice").await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type"),
        "application/xml; charset=utf-8"
    );
    assert_eq!(response.header("x-bulletin-degraded"), "false");
    let text = response.text();
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>"));
    assert!(text.contains("<Say language=\"es-ES\">El tiempo en Madrid.</Say>"));
    assert!(text.contains("Ahora: cielo despejado. Temperatura 21 grados"));
    assert!(text.contains("Actualizado 14:15."));
}

#[tokio::test]
async fn voice_accepts_post() {
    let server = create_test_server(ScriptedWeather::new(Ok(good_snapshot())));

    let response = server.post("/voice").await;

    response.assert_status_ok();
    assert!(response.text().contains("El tiempo en Madrid."));
}

#[tokio::test]
async fn voice_degrades_instead_of_failing() {
    let server = create_test_server(ScriptedWeather::new(Err(upstream_failure())));

    let response = server.get("/voice").await;

    response.assert_status_ok();
    assert_eq!(response.header("x-bulletin-degraded"), "true");
    let text = response.text();
    assert!(text.contains(
        "Lo sentimos, la información meteorológica no está disponible en este momento."
    ));
    assert!(text.contains("Son las 14:30."));
    assert!(!text.contains("maintenance"));
}

#[tokio::test]
async fn failed_refresh_keeps_serving_good_bulletin() {
    let weather = ScriptedWeather::new(Ok(good_snapshot()));
    let server = create_test_server(Arc::clone(&weather));

    server.get("/voice").await.assert_status_ok();
    weather.set(Err(upstream_failure()));
    server
        .post("/refresh")
        .await
        .assert_status(StatusCode::BAD_GATEWAY);

    let response = server.get("/voice").await;
    assert_eq!(response.header("x-bulletin-degraded"), "false");
    assert!(response.text().contains("cielo despejado"));
}

// ============================================================================
// Forced refresh
// ============================================================================

#[tokio::test]
async fn refresh_success() {
    let server = create_test_server(ScriptedWeather::new(Ok(good_snapshot())));

    let response = server.post("/refresh").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert!(body["message"].is_string());
    assert!(body["upstream_status"].is_null());
    assert!(body["upstream_body"].is_null());
}

#[tokio::test]
async fn refresh_accepts_get() {
    let server = create_test_server(ScriptedWeather::new(Ok(good_snapshot())));
    server.get("/refresh").await.assert_status_ok();
}

#[tokio::test]
async fn refresh_upstream_failure_reports_upstream_answer() {
    let server = create_test_server(ScriptedWeather::new(Err(upstream_failure())));

    let response = server.post("/refresh").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["ok"], false);
    assert_eq!(body["upstream_status"], 503);
    assert_eq!(body["upstream_body"], json!({"reason": "maintenance"}));
    assert!(body["error"].as_str().unwrap().contains("HTTP 503"));
}

#[tokio::test]
async fn refresh_stale_data_is_bad_gateway() {
    let mut snapshot = good_snapshot();
    if let Some(obs) = snapshot.observation.as_mut() {
        obs.source_timestamps = vec!["2024-05-15T09:00:00+00:00".to_string()];
    }
    let server = create_test_server(ScriptedWeather::new(Ok(snapshot)));

    let response = server.post("/refresh").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["upstream_status"].is_null());
}

#[tokio::test]
async fn refresh_configuration_failure_is_internal() {
    let server = create_test_server(ScriptedWeather::new(Err(
        ApplicationError::Configuration("station feed API key is not configured".into()),
    )));

    let response = server.post("/refresh").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["ok"], false);
}
