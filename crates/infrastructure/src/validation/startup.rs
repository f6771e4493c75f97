//! Startup validation for application configuration
//!
//! Checks the loaded configuration and reports problems at startup. A
//! missing credential only degrades the bulletin and is reported as a
//! warning; settings the server cannot run with are critical.

use std::fmt;

use crate::config::{AppConfig, WeatherProvider};
use crate::scheduler::validate_cron;

/// Severity level for configuration warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningSeverity {
    /// Informational - no action required
    Info,
    /// Warning - the service runs but the bulletin may be degraded
    Warning,
    /// Critical - the service cannot run with this setting
    Critical,
}

impl fmt::Display for WarningSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A configuration warning with severity and description
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// Severity level of the warning
    pub severity: WarningSeverity,
    /// Short code identifying the warning type
    pub code: &'static str,
    /// Human-readable description of the issue
    pub message: String,
    /// Recommended action to resolve the issue
    pub recommendation: &'static str,
}

impl ConfigWarning {
    fn new(
        severity: WarningSeverity,
        code: &'static str,
        message: impl Into<String>,
        recommendation: &'static str,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            recommendation,
        }
    }

    /// Check if this warning is critical
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self.severity, WarningSeverity::Critical)
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} - {}",
            self.severity, self.code, self.message, self.recommendation
        )
    }
}

/// Validates application configuration before the server starts
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration and return all warnings, critical first
    #[must_use]
    pub fn validate(config: &AppConfig) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        Self::check_weather_source(config, &mut warnings);
        Self::check_station_feed(config, &mut warnings);
        Self::check_bulletin(config, &mut warnings);
        Self::check_cors(config, &mut warnings);

        warnings.sort_by(|a, b| b.severity.cmp(&a.severity));
        warnings
    }

    /// Whether any warning prevents startup
    #[must_use]
    pub fn has_critical(warnings: &[ConfigWarning]) -> bool {
        warnings.iter().any(ConfigWarning::is_critical)
    }

    /// Log all warnings using tracing
    pub fn log_warnings(warnings: &[ConfigWarning]) {
        for warning in warnings {
            match warning.severity {
                WarningSeverity::Critical => {
                    tracing::error!(
                        code = warning.code,
                        message = %warning.message,
                        recommendation = warning.recommendation,
                        "Configuration error"
                    );
                },
                WarningSeverity::Warning => {
                    tracing::warn!(
                        code = warning.code,
                        message = %warning.message,
                        recommendation = warning.recommendation,
                        "Configuration warning"
                    );
                },
                WarningSeverity::Info => {
                    tracing::info!(
                        code = warning.code,
                        message = %warning.message,
                        recommendation = warning.recommendation,
                        "Configuration notice"
                    );
                },
            }
        }
    }

    fn check_weather_source(config: &AppConfig, warnings: &mut Vec<ConfigWarning>) {
        if let Err(e) = config.weather.timezone() {
            warnings.push(ConfigWarning::new(
                WarningSeverity::Critical,
                "CFG001",
                e.to_string(),
                "Set weather.timezone to an IANA zone name such as Europe/Madrid",
            ));
        }

        if config.weather.provider == WeatherProvider::OpenMeteo {
            if let Err(e) = config.weather.location() {
                warnings.push(ConfigWarning::new(
                    WarningSeverity::Critical,
                    "CFG002",
                    e.to_string(),
                    "Set weather.latitude within [-90, 90] and weather.longitude within [-180, 180]",
                ));
            }
        }

        if config.weather.timeout_secs == 0 {
            warnings.push(ConfigWarning::new(
                WarningSeverity::Warning,
                "CFG003",
                "weather.timeout_secs is 0",
                "Use a positive fetch timeout (default 10 seconds)",
            ));
        }
    }

    fn check_station_feed(config: &AppConfig, warnings: &mut Vec<ConfigWarning>) {
        if config.weather.provider != WeatherProvider::StationFeed {
            return;
        }
        let feed = &config.station_feed;

        if !feed.has_api_key() {
            warnings.push(ConfigWarning::new(
                WarningSeverity::Warning,
                "CFG010",
                "Station feed selected without an API key; the bulletin will be degraded",
                "Set METEOVOZ_STATION_FEED__API_KEY",
            ));
        }

        if feed.url.trim().is_empty() {
            warnings.push(ConfigWarning::new(
                WarningSeverity::Critical,
                "CFG011",
                "station_feed.url is empty",
                "Set station_feed.url to the observation feed endpoint",
            ));
        }

        if feed.keywords.iter().all(|k| k.trim().is_empty()) {
            warnings.push(ConfigWarning::new(
                WarningSeverity::Warning,
                "CFG012",
                "station_feed.keywords is empty; no station can ever match",
                "List at least one keyword contained in the target station's name",
            ));
        }
    }

    fn check_bulletin(config: &AppConfig, warnings: &mut Vec<ConfigWarning>) {
        let bulletin = &config.bulletin;

        if let Err(e) = validate_cron(&bulletin.refresh_cron) {
            warnings.push(ConfigWarning::new(
                WarningSeverity::Critical,
                "CFG020",
                e.to_string(),
                "Use a six-field cron expression, e.g. \"0 */30 * * * *\"",
            ));
        }

        if bulletin.forecast_days > bulletin.effective_forecast_days() {
            warnings.push(ConfigWarning::new(
                WarningSeverity::Info,
                "CFG021",
                format!(
                    "bulletin.forecast_days = {} exceeds the supported horizon",
                    bulletin.forecast_days
                ),
                "The forecast is limited to 3 days",
            ));
        }

        if bulletin.cache_ttl_minutes == 0 {
            warnings.push(ConfigWarning::new(
                WarningSeverity::Warning,
                "CFG022",
                "bulletin.cache_ttl_minutes is 0; every request triggers a fetch",
                "Use a lifetime longer than the refresh interval (default 65 minutes)",
            ));
        }

        if let Some(url) = bulletin.callback() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                warnings.push(ConfigWarning::new(
                    WarningSeverity::Warning,
                    "CFG023",
                    format!("bulletin.callback_url is not an http(s) URL: {url}"),
                    "Use an absolute http:// or https:// URL",
                ));
            }
        }
    }

    fn check_cors(config: &AppConfig, warnings: &mut Vec<ConfigWarning>) {
        if config.server.cors_enabled && config.server.allowed_origins.is_empty() {
            warnings.push(ConfigWarning::new(
                WarningSeverity::Info,
                "CFG030",
                "CORS is enabled with no origin restrictions (allows all origins)",
                "Specify server.allowed_origins to restrict cross-origin requests",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn codes(warnings: &[ConfigWarning]) -> Vec<&'static str> {
        warnings.iter().map(|w| w.code).collect()
    }

    fn quiet_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.allowed_origins = vec!["https://example.com".into()];
        config
    }

    #[test]
    fn defaults_produce_no_warnings() {
        assert!(ConfigValidator::validate(&quiet_config()).is_empty());
    }

    #[test]
    fn open_cors_is_informational() {
        let warnings = ConfigValidator::validate(&AppConfig::default());
        assert_eq!(codes(&warnings), vec!["CFG030"]);
        assert!(!ConfigValidator::has_critical(&warnings));
    }

    #[test]
    fn invalid_timezone_is_critical() {
        let mut config = quiet_config();
        config.weather.timezone = "Europe/Atlantis".into();
        let warnings = ConfigValidator::validate(&config);
        assert_eq!(codes(&warnings), vec!["CFG001"]);
        assert!(ConfigValidator::has_critical(&warnings));
    }

    #[test]
    fn invalid_cron_is_critical() {
        let mut config = quiet_config();
        config.bulletin.refresh_cron = "every half hour".into();
        let warnings = ConfigValidator::validate(&config);
        assert!(codes(&warnings).contains(&"CFG020"));
        assert!(ConfigValidator::has_critical(&warnings));
    }

    #[test]
    fn missing_station_key_only_warns() {
        let mut config = quiet_config();
        config.weather.provider = WeatherProvider::StationFeed;
        let warnings = ConfigValidator::validate(&config);
        assert_eq!(codes(&warnings), vec!["CFG010"]);
        assert!(!ConfigValidator::has_critical(&warnings));
    }

    #[test]
    fn station_checks_skipped_for_open_meteo() {
        let mut config = quiet_config();
        config.station_feed.keywords.clear();
        assert!(ConfigValidator::validate(&config).is_empty());
    }

    #[test]
    fn station_feed_without_keywords_warns() {
        let mut config = quiet_config();
        config.weather.provider = WeatherProvider::StationFeed;
        config.station_feed.api_key = Some(SecretString::from("key".to_string()));
        config.station_feed.keywords = vec!["  ".into()];
        assert_eq!(codes(&ConfigValidator::validate(&config)), vec!["CFG012"]);
    }

    #[test]
    fn bulletin_checks() {
        let mut config = quiet_config();
        config.bulletin.forecast_days = 7;
        config.bulletin.cache_ttl_minutes = 0;
        config.bulletin.callback_url = Some("ftp://example.com/menu".into());
        let warnings = ConfigValidator::validate(&config);
        assert_eq!(codes(&warnings), vec!["CFG022", "CFG023", "CFG021"]);
    }

    #[test]
    fn warnings_sorted_critical_first() {
        let mut config = AppConfig::default();
        config.weather.latitude = 91.0;
        let warnings = ConfigValidator::validate(&config);
        assert_eq!(warnings[0].severity, WarningSeverity::Critical);
        assert_eq!(warnings.last().unwrap().severity, WarningSeverity::Info);
    }

    #[test]
    fn display_format() {
        let warning = ConfigWarning::new(
            WarningSeverity::Warning,
            "CFG999",
            "something",
            "fix it",
        );
        assert_eq!(warning.to_string(), "[WARNING] CFG999: something - fix it");
    }
}
