//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo forecast API, plus the request helpers
//! shared by every fetcher in this crate.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDateTime, TimeZone};
use domain::{HourlyRecord, RawObservation, Timezone, WeatherCode, WeatherSnapshot};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, instrument, warn};

use crate::config::OpenMeteoConfig;
use crate::error::WeatherError;
use crate::models::{ApiResponse, CurrentData, HourlyData};

/// Variables requested in the `current` section
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code";

/// Variables requested in the `hourly` section
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code";

/// Local time format used by Open-Meteo (`iso8601` without offset)
const NAIVE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Largest horizon the bulletin ever speaks about
const MAX_FORECAST_DAYS: u8 = 3;

/// A source of weather snapshots for the configured location
#[async_trait]
pub trait WeatherClient: Send + Sync + std::fmt::Debug {
    /// Perform one bounded request and return the raw snapshot
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, WeatherError>;

    /// Short provider identifier for logs
    fn provider_name(&self) -> &'static str;
}

/// Build a reqwest client with the fetch timeout applied
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, WeatherError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| WeatherError::RequestFailed(e.to_string()))
}

/// Send a request and return the body of a successful response
///
/// Non-2xx statuses become [`WeatherError::Upstream`] carrying the body;
/// transport failures and timeouts never reach the body stage.
pub(crate) async fn send_for_body(
    request: RequestBuilder,
    timeout_secs: u64,
) -> Result<String, WeatherError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            WeatherError::Timeout { timeout_secs }
        } else {
            WeatherError::RequestFailed(e.to_string())
        }
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            WeatherError::Timeout { timeout_secs }
        } else {
            WeatherError::RequestFailed(e.to_string())
        }
    })?;

    if !status.is_success() {
        warn!(status = status.as_u16(), "Upstream returned an error status");
        return Err(WeatherError::upstream(status.as_u16(), &body));
    }

    Ok(body)
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, WeatherError> {
        let client = build_http_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }

    /// Days of hourly data actually requested
    fn forecast_days(&self) -> u8 {
        self.config.forecast_days.min(MAX_FORECAST_DAYS)
    }

    /// Query parameters for the `/forecast` call
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let days = self.forecast_days();
        let mut params = vec![
            ("latitude", self.config.location.latitude().to_string()),
            ("longitude", self.config.location.longitude().to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("timezone", self.config.timezone.name().to_string()),
            ("forecast_days", days.max(1).to_string()),
        ];
        if days > 0 {
            params.push(("hourly", HOURLY_FIELDS.to_string()));
        }
        params
    }

    /// Turn the `current` section into an observation
    ///
    /// The naive local time is combined with the response offset so the
    /// timestamp candidate carries an explicit zone.
    fn parse_current(current: &CurrentData, utc_offset_seconds: i32) -> RawObservation {
        let source_timestamp = NaiveDateTime::parse_from_str(&current.time, NAIVE_TIME_FORMAT)
            .ok()
            .zip(FixedOffset::east_opt(utc_offset_seconds))
            .and_then(|(naive, offset)| offset.from_local_datetime(&naive).single())
            .map_or_else(|| current.time.clone(), |dt| dt.to_rfc3339());

        RawObservation {
            temperature: current.temperature_2m,
            apparent_temperature: current.apparent_temperature,
            humidity: current.relative_humidity_2m,
            weather_code: current.weather_code.map(WeatherCode::new),
            source_timestamps: vec![source_timestamp],
        }
    }

    /// Turn the column-oriented `hourly` section into records
    ///
    /// Local times falling into a DST gap do not exist in the zone and are
    /// skipped.
    fn parse_hourly(
        hourly: &HourlyData,
        timezone: Timezone,
    ) -> Result<Vec<HourlyRecord>, WeatherError> {
        let mut records = Vec::with_capacity(hourly.time.len());

        for (i, raw_time) in hourly.time.iter().enumerate() {
            let naive = NaiveDateTime::parse_from_str(raw_time, NAIVE_TIME_FORMAT)
                .map_err(|e| WeatherError::ParseError(format!("Invalid hourly time {raw_time}: {e}")))?;

            let Some(timestamp) = timezone.from_local(naive) else {
                debug!(time = %raw_time, "Skipping nonexistent local hour");
                continue;
            };

            records.push(HourlyRecord {
                timestamp,
                weather_code: hourly
                    .weather_code
                    .get(i)
                    .copied()
                    .flatten()
                    .map(WeatherCode::new),
                temperature: hourly.temperature_2m.get(i).copied().flatten(),
                humidity: hourly.relative_humidity_2m.get(i).copied().flatten(),
            });
        }

        Ok(records)
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/forecast", self.config.base_url.trim_end_matches('/'));
        debug!(
            url = %url,
            location = %self.config.location,
            days = self.forecast_days(),
            "Fetching Open-Meteo forecast"
        );

        let request = self.client.get(&url).query(&self.query_params());
        let body = send_for_body(request, self.config.timeout_secs).await?;

        let api_response: ApiResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let current = api_response.current.as_ref().ok_or_else(|| {
            WeatherError::ParseError("No current weather data in response".to_string())
        })?;
        let observation = Self::parse_current(current, api_response.utc_offset_seconds);

        let hourly = if self.forecast_days() > 0 {
            let hourly_data = api_response.hourly.as_ref().ok_or_else(|| {
                WeatherError::ParseError("No hourly forecast data in response".to_string())
            })?;
            Self::parse_hourly(hourly_data, self.config.timezone)?
        } else {
            Vec::new()
        };

        debug!(
            timezone = ?api_response.timezone,
            hours = hourly.len(),
            "Parsed Open-Meteo response"
        );

        Ok(WeatherSnapshot {
            source_name: None,
            observation: Some(observation),
            hourly,
        })
    }

    fn provider_name(&self) -> &'static str {
        "open_meteo"
    }
}
