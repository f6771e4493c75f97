//! End-to-end bulletin pipeline tests
//!
//! Wires the configured weather adapter, the bulletin service, the voice
//! document renderer and the cache against a wiremock upstream.

use std::sync::Arc;

use application::{ApplicationError, BulletinCache, BulletinService, fixed_clock};
use chrono::{TimeZone, Utc};
use infrastructure::{AppConfig, VoiceDocumentRenderer, WeatherAdapter, WeatherProvider};
use secrecy::SecretString;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Open-Meteo answer for 2024-05-15 in Madrid (UTC+2)
fn forecast_response() -> serde_json::Value {
    serde_json::json!({
        "latitude": 40.4375,
        "longitude": -3.6875,
        "utc_offset_seconds": 7200,
        "timezone": "Europe/Madrid",
        "current": {
            "time": "2024-05-15T14:15",
            "temperature_2m": 21.3,
            "relative_humidity_2m": 40,
            "apparent_temperature": 20.1,
            "weather_code": 2
        },
        "hourly": {
            "time": ["2024-05-15T14:00", "2024-05-15T15:00", "2024-05-16T07:00"],
            "temperature_2m": [21.0, 22.4, 14.0],
            "relative_humidity_2m": [41, null, 70],
            "weather_code": [2, 3, 61]
        }
    })
}

fn open_meteo_config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.weather.base_url = server.uri();
    config.weather.timeout_secs = 2;
    config.bulletin.callback_url = Some("https://example.com/menu".into());
    config
}

/// Build the cache the way the server does, with "now" pinned to 14:30 Madrid
fn build_cache(config: &AppConfig) -> BulletinCache {
    let adapter = WeatherAdapter::from_config(config).unwrap();
    let timezone = config.weather.timezone().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 30, 0).unwrap();
    let service = BulletinService::new(Arc::new(adapter), config.bulletin.to_settings(timezone))
        .with_clock(fixed_clock(now));
    BulletinCache::new(
        service,
        Arc::new(VoiceDocumentRenderer::new(config.bulletin.language.clone())),
        config.bulletin.cache_ttl(),
    )
}

// ============================================================================
// Successful refresh
// ============================================================================

#[tokio::test]
async fn open_meteo_refresh_renders_full_bulletin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = build_cache(&open_meteo_config(&server));
    let entry = cache.refresh().await.unwrap();
    let xml = &entry.rendered_payload;

    assert!(!entry.is_degraded);
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>"));
    assert!(xml.contains("<Say language=\"es-ES\">El tiempo en Madrid.</Say>"));
    assert!(xml.contains(
        "Ahora: parcialmente nublado. Temperatura 21 grados, sensación térmica 20 grados, humedad 40 por ciento."
    ));
    assert!(xml.contains("<Say language=\"es-ES\">Hoy.</Say>"));
    assert!(xml.contains("Ahora: parcialmente nublado. Entre 21 y 22 grados."));
    assert!(xml.contains("<Say language=\"es-ES\">Mañana.</Say>"));
    assert!(xml.contains("Por la mañana: lluvia débil. Entre 14 y 14 grados."));
    assert!(xml.contains("Actualizado 14:15."));
    assert!(xml.ends_with("<Redirect method=\"POST\">https://example.com/menu</Redirect></Response>"));
}

#[tokio::test]
async fn read_serves_cached_entry_without_refetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_response()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = build_cache(&open_meteo_config(&server));
    let first = cache.read().await;
    let second = cache.read().await;
    assert!(Arc::ptr_eq(&first, &second));
}

// ============================================================================
// Failures become degraded documents
// ============================================================================

#[tokio::test]
async fn upstream_error_yields_degraded_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("{\"reason\":\"maintenance\"}"))
        .mount(&server)
        .await;

    let cache = build_cache(&open_meteo_config(&server));
    let err = cache.refresh().await.unwrap_err();
    assert_eq!(err.upstream_status(), Some(503));
    assert_eq!(err.upstream_body(), Some("{\"reason\":\"maintenance\"}"));

    let entry = cache.peek().unwrap();
    assert!(entry.is_degraded);
    assert!(entry.rendered_payload.contains("Son las 14:30."));
    assert!(
        entry
            .rendered_payload
            .contains("Motivo: el servicio meteorológico no responde.")
    );
    assert!(!entry.rendered_payload.contains("maintenance"));
}

#[tokio::test]
async fn station_feed_without_key_is_configuration_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.weather.provider = WeatherProvider::StationFeed;
    config.station_feed.url = format!("{}/feed", server.uri());

    let cache = build_cache(&config);
    let err = cache.refresh().await.unwrap_err();
    assert!(matches!(err, ApplicationError::Configuration(_)));
    assert!(
        cache
            .peek()
            .unwrap()
            .rendered_payload
            .contains("Motivo: configuración incompleta.")
    );
}

#[tokio::test]
async fn stale_station_reading_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"ubi": "MADRID RETIRO", "fint": "2024-05-15T09:00:00+0000", "ta": 18.0}
        ])))
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.weather.provider = WeatherProvider::StationFeed;
    config.station_feed.url = format!("{}/feed", server.uri());
    config.station_feed.api_key = Some(SecretString::from("key".to_string()));

    let cache = build_cache(&config);
    let err = cache.refresh().await.unwrap_err();
    assert!(matches!(err, ApplicationError::StaleData(_)));
    assert!(
        cache
            .peek()
            .unwrap()
            .rendered_payload
            .contains("Motivo: datos desactualizados.")
    );
}

#[tokio::test]
async fn fresh_station_reading_uses_station_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"ubi": "MADRID RETIRO", "fint": "2024-05-15T12:00:00+0000", "ta": 22.4, "hr": 38}
        ])))
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.weather.provider = WeatherProvider::StationFeed;
    config.station_feed.url = format!("{}/feed", server.uri());
    config.station_feed.api_key = Some(SecretString::from("key".to_string()));
    config.bulletin.location_name = None;

    let cache = build_cache(&config);
    let entry = cache.refresh().await.unwrap();
    assert!(entry.rendered_payload.contains("El tiempo en MADRID RETIRO."));
    assert!(entry.rendered_payload.contains("Temperatura 22 grados, humedad 38 por ciento."));
    assert!(entry.rendered_payload.contains("Actualizado 14:00."));
}
