//! Bulletin content, cache and refresh configuration.

use application::{BulletinSettings, FreshnessWindow};
use domain::Timezone;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Largest forecast horizon the bulletin speaks about
const MAX_FORECAST_DAYS: u8 = 3;

/// Bulletin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletinConfig {
    /// Spoken location; blank means "use the source's station name"
    #[serde(default = "default_location_name")]
    pub location_name: Option<String>,

    /// Speak the current-conditions line
    #[serde(default = "default_true")]
    pub include_current: bool,

    /// Forecast days, today included (0-3)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// Speak mean humidity per day part
    #[serde(default)]
    pub include_humidity: bool,

    /// Lifetime of a cached document in minutes
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,

    /// Cron expression (with seconds) for background refreshes
    #[serde(default = "default_refresh_cron")]
    pub refresh_cron: String,

    /// Follow-up URL appended as a redirect to every document
    #[serde(default)]
    pub callback_url: Option<String>,

    /// Language tag of the spoken text
    #[serde(default = "default_language")]
    pub language: String,

    /// Oldest observation the bulletin will speak about, in minutes
    #[serde(default = "default_max_data_age_minutes")]
    pub max_data_age_minutes: u32,

    /// How far ahead of the local clock an observation may be dated, in minutes
    #[serde(default = "default_future_tolerance_minutes")]
    pub future_tolerance_minutes: u32,
}

#[allow(clippy::unnecessary_wraps)]
fn default_location_name() -> Option<String> {
    Some("Madrid".to_string())
}

const fn default_forecast_days() -> u8 {
    MAX_FORECAST_DAYS
}

const fn default_cache_ttl_minutes() -> u32 {
    65
}

fn default_refresh_cron() -> String {
    "0 */30 * * * *".to_string()
}

fn default_language() -> String {
    "es-ES".to_string()
}

const fn default_max_data_age_minutes() -> u32 {
    120
}

const fn default_future_tolerance_minutes() -> u32 {
    10
}

impl Default for BulletinConfig {
    fn default() -> Self {
        Self {
            location_name: default_location_name(),
            include_current: true,
            forecast_days: default_forecast_days(),
            include_humidity: false,
            cache_ttl_minutes: default_cache_ttl_minutes(),
            refresh_cron: default_refresh_cron(),
            callback_url: None,
            language: default_language(),
            max_data_age_minutes: default_max_data_age_minutes(),
            future_tolerance_minutes: default_future_tolerance_minutes(),
        }
    }
}

impl BulletinConfig {
    /// Forecast days clamped to the supported horizon
    #[must_use]
    pub fn effective_forecast_days(&self) -> u8 {
        self.forecast_days.min(MAX_FORECAST_DAYS)
    }

    /// Cache entry lifetime
    #[must_use]
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.cache_ttl_minutes))
    }

    /// Callback URL if set and non-blank
    #[must_use]
    pub fn callback(&self) -> Option<&str> {
        self.callback_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Build the application-layer settings
    #[must_use]
    pub fn to_settings(&self, timezone: Timezone) -> BulletinSettings {
        BulletinSettings {
            location_name: self
                .location_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            timezone,
            include_current: self.include_current,
            forecast_days: self.effective_forecast_days(),
            include_humidity: self.include_humidity,
            redirect_url: self.callback().map(str::to_string),
            freshness: FreshnessWindow {
                max_age: chrono::Duration::minutes(i64::from(self.max_data_age_minutes)),
                future_tolerance: chrono::Duration::minutes(i64::from(
                    self.future_tolerance_minutes,
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BulletinConfig::default();
        assert_eq!(config.location_name.as_deref(), Some("Madrid"));
        assert_eq!(config.cache_ttl(), chrono::Duration::minutes(65));
        assert_eq!(config.refresh_cron, "0 */30 * * * *");
        assert_eq!(config.language, "es-ES");
        assert!(config.include_current);
    }

    #[test]
    fn forecast_days_are_clamped() {
        let config = BulletinConfig {
            forecast_days: 9,
            ..Default::default()
        };
        assert_eq!(config.effective_forecast_days(), 3);
        assert_eq!(config.to_settings(Timezone::default()).forecast_days, 3);
    }

    #[test]
    fn freshness_limits_reach_settings() {
        let config = BulletinConfig {
            max_data_age_minutes: 30,
            future_tolerance_minutes: 5,
            ..Default::default()
        };
        let window = config.to_settings(Timezone::default()).freshness;
        assert_eq!(window.max_age, chrono::Duration::minutes(30));
        assert_eq!(window.future_tolerance, chrono::Duration::minutes(5));
        assert_eq!(
            BulletinConfig::default().to_settings(Timezone::default()).freshness,
            FreshnessWindow::default()
        );
    }

    #[test]
    fn blank_location_defers_to_source() {
        let config = BulletinConfig {
            location_name: Some("   ".into()),
            ..Default::default()
        };
        assert!(config.to_settings(Timezone::default()).location_name.is_none());
    }

    #[test]
    fn blank_callback_is_ignored() {
        let config = BulletinConfig {
            callback_url: Some(" ".into()),
            ..Default::default()
        };
        assert!(config.callback().is_none());
        assert!(config.to_settings(Timezone::default()).redirect_url.is_none());
    }

    #[test]
    fn callback_is_passed_through() {
        let config = BulletinConfig {
            callback_url: Some("https://example.org/menu".into()),
            ..Default::default()
        };
        assert_eq!(
            config.to_settings(Timezone::default()).redirect_url.as_deref(),
            Some("https://example.org/menu")
        );
    }
}
