//! Fetcher configuration

use domain::{GeoLocation, Timezone};
use serde::{Deserialize, Serialize};

/// Open-Meteo forecast client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Point to forecast
    #[serde(default)]
    pub location: GeoLocation,

    /// Zone the provider should report local times in
    #[serde(default)]
    pub timezone: Timezone,

    /// Days of hourly data to request (0-3, 0 disables the hourly section)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_forecast_days() -> u8 {
    3
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            location: GeoLocation::default(),
            timezone: Timezone::default(),
            forecast_days: default_forecast_days(),
        }
    }
}

/// Multi-station observation feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationFeedConfig {
    /// Feed URL returning a JSON array of station records
    pub url: String,

    /// API key sent in the `api_key` header
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Keywords matched against station names (+1 each)
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Keyword worth an extra bonus when present in a station name
    #[serde(default)]
    pub priority_keyword: Option<String>,
}

impl Default for StationFeedConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            keywords: Vec::new(),
            priority_keyword: None,
        }
    }
}
