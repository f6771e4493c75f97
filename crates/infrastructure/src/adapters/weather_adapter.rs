//! Weather adapter - Implements WeatherPort using integration_weather

use application::error::ApplicationError;
use application::ports::WeatherPort;
use async_trait::async_trait;
use domain::WeatherSnapshot;
use integration_weather::{OpenMeteoClient, StationFeedClient, WeatherClient, WeatherError};
use tracing::{debug, instrument, warn};

use crate::config::{AppConfig, WeatherProvider};

/// Adapter exposing one configured weather client as a [`WeatherPort`]
pub struct WeatherAdapter {
    client: Box<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("provider", &self.client.provider_name())
            .finish()
    }
}

impl WeatherAdapter {
    /// Wrap an existing client
    pub fn new(client: impl WeatherClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Build the client selected by `weather.provider`
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid coordinates or zone, and an
    /// internal error if the HTTP client fails to initialize.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        match config.weather.provider {
            WeatherProvider::OpenMeteo => {
                let client_config = config
                    .weather
                    .to_open_meteo_config(config.bulletin.effective_forecast_days())?;
                let client = OpenMeteoClient::new(client_config)
                    .map_err(|e| ApplicationError::Internal(e.to_string()))?;
                Ok(Self::new(client))
            },
            WeatherProvider::StationFeed => {
                let client = StationFeedClient::new(config.station_feed.to_station_feed_config())
                    .map_err(|e| ApplicationError::Internal(e.to_string()))?;
                Ok(Self::new(client))
            },
        }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::Upstream { status, body } => ApplicationError::Upstream {
                message: format!("weather service returned HTTP {status}"),
                status: Some(status),
                body: Some(body),
            },
            WeatherError::RequestFailed(_) | WeatherError::Timeout { .. } => {
                ApplicationError::Upstream {
                    message: err.to_string(),
                    status: None,
                    body: None,
                }
            },
            WeatherError::ParseError(e) => ApplicationError::Parse(e),
            WeatherError::StationNotFound(e) => ApplicationError::NotFound(e),
            WeatherError::ConfigurationError(e) => ApplicationError::Configuration(e),
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(skip(self), fields(provider = self.client.provider_name()))]
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, ApplicationError> {
        match self.client.fetch_snapshot().await {
            Ok(snapshot) => {
                debug!(
                    source = ?snapshot.source_name,
                    hours = snapshot.hourly.len(),
                    has_observation = snapshot.observation.is_some(),
                    "Retrieved weather snapshot"
                );
                Ok(snapshot)
            },
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "Failed to retrieve weather snapshot");
                Err(Self::map_error(e))
            },
        }
    }

    fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }
}
