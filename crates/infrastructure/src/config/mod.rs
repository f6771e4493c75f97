//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `weather`: provider selection, Open-Meteo point and station feed
//! - `bulletin`: spoken content, cache lifetime and refresh schedule
//!
//! Sources are layered: built-in defaults, then an optional `config.toml`,
//! then `METEOVOZ_`-prefixed environment variables (nested keys joined by
//! `__`, e.g. `METEOVOZ_BULLETIN__CACHE_TTL_MINUTES=30`).

mod bulletin;
mod server;
mod weather;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use bulletin::BulletinConfig;
pub use server::ServerConfig;
pub use weather::{StationFeedAppConfig, WeatherConfig, WeatherProvider};

use crate::telemetry::TelemetryConfig;

/// Prefix of every configuration environment variable
pub const ENV_PREFIX: &str = "METEOVOZ";

/// Environment variable naming the configuration file (without extension)
pub const CONFIG_FILE_ENV: &str = "METEOVOZ_CONFIG";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Weather source configuration
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Station feed configuration (used when `weather.provider = "station_feed"`)
    #[serde(default)]
    pub station_feed: StationFeedAppConfig,

    /// Bulletin configuration
    #[serde(default)]
    pub bulletin: BulletinConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from the process environment and optional file
    ///
    /// The file name comes from `METEOVOZ_CONFIG` and defaults to `config`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let file = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| "config".to_string());
        Self::build(
            config::File::with_name(&file).required(false),
            environment_source(None),
        )
    }

    /// Parse a TOML document, with `vars` standing in for the environment
    pub fn from_toml_str(
        toml: &str,
        vars: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        Self::build(
            config::File::from_str(toml, config::FileFormat::Toml),
            environment_source(vars),
        )
    }

    fn build<F>(file: F, env: config::Environment) -> Result<Self, config::ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

/// `METEOVOZ_SECTION__KEY` variables; `vars` replaces the process environment
fn environment_source(vars: Option<HashMap<String, String>>) -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("station_feed.keywords")
        .with_list_parse_key("server.allowed_origins")
        .source(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_toml_str("", vars(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.weather.provider, WeatherProvider::OpenMeteo);
        assert_eq!(config.weather.timeout_secs, 10);
        assert_eq!(config.bulletin.cache_ttl_minutes, 65);
        assert!(config.station_feed.api_key.is_none());
    }

    #[test]
    fn toml_sections_are_read() {
        let toml = r#"
            [server]
            port = 9000

            [weather]
            provider = "station_feed"
            timezone = "Atlantic/Canary"

            [station_feed]
            url = "https://feed.example/obs"
            api_key = "abc"
            keywords = ["tenerife", "norte"]
            priority_keyword = "norte"

            [bulletin]
            location_name = ""
            forecast_days = 2
            include_humidity = true
            callback_url = "https://example.org/next"
        "#;
        let config = AppConfig::from_toml_str(toml, vars(&[])).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.weather.provider, WeatherProvider::StationFeed);
        assert_eq!(config.weather.timezone().unwrap().name(), "Atlantic/Canary");
        assert_eq!(config.station_feed.keywords, vec!["tenerife", "norte"]);
        assert_eq!(
            config.station_feed.api_key.as_ref().unwrap().expose_secret(),
            "abc"
        );
        assert_eq!(config.bulletin.forecast_days, 2);
        assert!(config.bulletin.include_humidity);
    }

    #[test]
    fn environment_overrides_file() {
        let config = AppConfig::from_toml_str(
            "[bulletin]\ncache_ttl_minutes = 10\n",
            vars(&[
                ("METEOVOZ_BULLETIN__CACHE_TTL_MINUTES", "30"),
                ("METEOVOZ_SERVER__PORT", "9100"),
                ("METEOVOZ_STATION_FEED__KEYWORDS", "madrid,retiro"),
                ("METEOVOZ_STATION_FEED__API_KEY", "from-env"),
            ]),
        )
        .unwrap();
        assert_eq!(config.bulletin.cache_ttl_minutes, 30);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.station_feed.keywords, vec!["madrid", "retiro"]);
        assert!(config.station_feed.has_api_key());
    }

    #[test]
    fn invalid_provider_is_rejected() {
        let result = AppConfig::from_toml_str("[weather]\nprovider = \"ftp\"\n", vars(&[]));
        assert!(result.is_err());
    }
}
