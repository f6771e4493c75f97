//! Weather source configuration.

use std::fmt;

use domain::{DomainError, GeoLocation, Timezone};
use integration_weather::{OpenMeteoConfig, StationFeedConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Which upstream feeds the bulletin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherProvider {
    /// Open-Meteo point forecast (no credential needed)
    #[default]
    OpenMeteo,
    /// Multi-station observation feed selected by keywords
    StationFeed,
}

impl fmt::Display for WeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenMeteo => write!(f, "open_meteo"),
            Self::StationFeed => write!(f, "station_feed"),
        }
    }
}

impl std::str::FromStr for WeatherProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "open_meteo" | "openmeteo" => Ok(Self::OpenMeteo),
            "station_feed" | "station" => Ok(Self::StationFeed),
            _ => Err(format!(
                "Invalid weather provider: {s}. Use 'open_meteo' or 'station_feed'"
            )),
        }
    }
}

/// Open-Meteo source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Active provider
    #[serde(default)]
    pub provider: WeatherProvider,

    /// Open-Meteo API base URL
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Latitude of the forecast point
    #[serde(default = "default_latitude")]
    pub latitude: f64,

    /// Longitude of the forecast point
    #[serde(default = "default_longitude")]
    pub longitude: f64,

    /// IANA zone for every local-time decision
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

fn default_timezone() -> String {
    "Europe/Madrid".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_latitude() -> f64 {
    40.4168
}

const fn default_longitude() -> f64 {
    -3.7038
}

const fn default_weather_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            provider: WeatherProvider::default(),
            base_url: default_weather_base_url(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: default_timezone(),
            timeout_secs: default_weather_timeout(),
        }
    }
}

impl WeatherConfig {
    /// Validated forecast point
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` when out of range.
    pub fn location(&self) -> Result<GeoLocation, DomainError> {
        GeoLocation::new(self.latitude, self.longitude)
    }

    /// Validated target zone
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` for unknown zone names.
    pub fn timezone(&self) -> Result<Timezone, DomainError> {
        Timezone::parse(&self.timezone)
    }

    /// Convert to `integration_weather`'s `OpenMeteoConfig`
    ///
    /// # Errors
    ///
    /// Returns an error when the coordinates or the zone are invalid.
    pub fn to_open_meteo_config(&self, forecast_days: u8) -> Result<OpenMeteoConfig, DomainError> {
        Ok(OpenMeteoConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            location: self.location()?,
            timezone: self.timezone()?,
            forecast_days,
        })
    }
}

/// Station feed settings
#[derive(Clone, Serialize, Deserialize)]
pub struct StationFeedAppConfig {
    /// Feed URL returning a JSON array of station records
    #[serde(default = "default_station_url")]
    pub url: String,

    /// API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Keywords matched against station names
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Keyword worth a bonus when matched
    #[serde(default)]
    pub priority_keyword: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

impl fmt::Debug for StationFeedAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StationFeedAppConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("keywords", &self.keywords)
            .field("priority_keyword", &self.priority_keyword)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_station_url() -> String {
    "https://opendata.aemet.es/opendata/api/observacion/convencional/todas".to_string()
}

fn default_keywords() -> Vec<String> {
    vec!["madrid".to_string()]
}

impl Default for StationFeedAppConfig {
    fn default() -> Self {
        Self {
            url: default_station_url(),
            api_key: None,
            keywords: default_keywords(),
            priority_keyword: None,
            timeout_secs: default_weather_timeout(),
        }
    }
}

impl StationFeedAppConfig {
    /// Whether a non-blank API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// Convert to `integration_weather`'s `StationFeedConfig`
    #[must_use]
    pub fn to_station_feed_config(&self) -> StationFeedConfig {
        StationFeedConfig {
            url: self.url.clone(),
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string()),
            timeout_secs: self.timeout_secs,
            keywords: self.keywords.clone(),
            priority_keyword: self.priority_keyword.clone(),
        }
    }
}
