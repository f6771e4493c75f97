//! Bulletin pipeline
//!
//! One run: fetch a snapshot, resolve and check the observation time,
//! segment the hourly forecast and phrase everything in Spanish.

use std::sync::Arc;

use domain::{Timezone, VoiceScript};
use tracing::{debug, info, instrument};

use crate::clock::{Clock, system_clock};
use crate::error::ApplicationError;
use crate::ports::WeatherPort;
use crate::services::phrase_builder::PhraseBuilder;
use crate::services::segmenter::{SegmenterOptions, segment_forecast};
use crate::services::timestamp_resolver::{FreshnessWindow, TimestampResolver};

/// Spoken when neither configuration nor source names the place
const FALLBACK_LOCATION: &str = "su zona";

/// What the bulletin says and in which zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletinSettings {
    /// Name spoken in the location line; the source's own name is used
    /// when unset
    pub location_name: Option<String>,
    /// Zone for every local-time decision
    pub timezone: Timezone,
    /// Speak the current-conditions line
    pub include_current: bool,
    /// Forecast days to speak, today included (0 disables the forecast)
    pub forecast_days: u8,
    /// Speak mean humidity per segment
    pub include_humidity: bool,
    /// Optional follow-up URL appended to every document
    pub redirect_url: Option<String>,
    /// Accepted age range of the observation time
    pub freshness: FreshnessWindow,
}

impl Default for BulletinSettings {
    fn default() -> Self {
        Self {
            location_name: None,
            timezone: Timezone::default(),
            include_current: true,
            forecast_days: 3,
            include_humidity: false,
            redirect_url: None,
            freshness: FreshnessWindow::default(),
        }
    }
}

/// Composes voice scripts from the configured weather source
pub struct BulletinService {
    weather: Arc<dyn WeatherPort>,
    settings: BulletinSettings,
    resolver: TimestampResolver,
    phrases: PhraseBuilder,
    clock: Clock,
}

impl std::fmt::Debug for BulletinService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulletinService")
            .field("provider", &self.weather.provider_name())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl BulletinService {
    /// Create a service on the system clock
    #[must_use]
    pub fn new(weather: Arc<dyn WeatherPort>, settings: BulletinSettings) -> Self {
        let resolver = TimestampResolver::new(settings.timezone).with_window(settings.freshness);
        let phrases = PhraseBuilder::new(settings.redirect_url.clone());
        Self {
            weather,
            settings,
            resolver,
            phrases,
            clock: system_clock(),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current settings
    #[must_use]
    pub const fn settings(&self) -> &BulletinSettings {
        &self.settings
    }

    /// The clock used for every "now"
    #[must_use]
    pub fn clock(&self) -> Clock {
        Arc::clone(&self.clock)
    }

    /// Run the pipeline once
    ///
    /// # Errors
    ///
    /// Propagates fetch failures and returns `Timestamp` or `StaleData`
    /// when the observation time cannot be trusted.
    #[instrument(skip(self), fields(provider = self.weather.provider_name()))]
    pub async fn compose(&self) -> Result<VoiceScript, ApplicationError> {
        let snapshot = self.weather.fetch_snapshot().await?;

        let now_utc = (self.clock)();
        let now = self.settings.timezone.localize(now_utc);

        let observed_at = snapshot
            .observation
            .as_ref()
            .map(|obs| self.resolver.resolve(&obs.source_timestamps, now_utc))
            .transpose()?;

        let days = if self.settings.forecast_days > 0 {
            segment_forecast(
                &snapshot.hourly,
                now,
                SegmenterOptions {
                    days: self.settings.forecast_days,
                    include_humidity: self.settings.include_humidity,
                },
            )
        } else {
            Vec::new()
        };
        debug!(
            hours = snapshot.hourly.len(),
            days = days.len(),
            "Segmented forecast"
        );

        let location = self
            .settings
            .location_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(snapshot.source_name.as_deref())
            .unwrap_or(FALLBACK_LOCATION);

        let current = if self.settings.include_current {
            snapshot.observation.as_ref()
        } else {
            None
        };

        let script = self
            .phrases
            .build(location, current, &days, observed_at.unwrap_or(now));
        info!(lines = script.lines.len(), "Composed bulletin");
        Ok(script)
    }

    /// Apology script for when no bulletin can be composed
    #[must_use]
    pub fn degraded(&self, error: Option<&ApplicationError>) -> VoiceScript {
        let now = self.settings.timezone.localize((self.clock)());
        self.phrases.degraded(now, error)
    }
}
