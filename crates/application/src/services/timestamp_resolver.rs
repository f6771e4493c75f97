//! Source timestamp resolution and freshness checks
//!
//! Providers report the observation time in a handful of formats. Each
//! candidate value is tried against three strategies in order; the first
//! candidate that parses wins.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use domain::Timezone;
use tracing::{debug, warn};

use crate::error::ApplicationError;

/// Zoned ISO-8601 layouts accepted besides RFC 3339
const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M%z"];

/// Day-first layouts interpreted in the local zone
const DAY_FIRST_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];

/// Bare clock time, taken as today in the local zone
const CLOCK_FORMAT: &str = "%H:%M";

/// Bounds on how old (or how far ahead) an observation may be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessWindow {
    /// Oldest acceptable observation
    pub max_age: Duration,
    /// How far in the future an observation may be dated
    pub future_tolerance: Duration,
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self {
            max_age: Duration::minutes(120),
            future_tolerance: Duration::minutes(10),
        }
    }
}

/// Resolves raw timestamp candidates to instants in the target zone
#[derive(Debug, Clone, Copy)]
pub struct TimestampResolver {
    timezone: Timezone,
    window: FreshnessWindow,
}

impl TimestampResolver {
    /// Create a resolver with the default freshness window
    #[must_use]
    pub fn new(timezone: Timezone) -> Self {
        Self {
            timezone,
            window: FreshnessWindow::default(),
        }
    }

    /// Override the freshness window
    #[must_use]
    pub const fn with_window(mut self, window: FreshnessWindow) -> Self {
        self.window = window;
        self
    }

    /// Parse a single raw value
    ///
    /// Tries zoned ISO-8601, then day-first local formats, then a bare
    /// `HH:MM` taken as today (relative to `now`) in the local zone.
    #[must_use]
    pub fn parse_one(&self, raw: &str, now: DateTime<Utc>) -> Option<DateTime<Tz>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        self.parse_zoned(raw)
            .or_else(|| self.parse_day_first(raw))
            .or_else(|| self.parse_clock(raw, now))
    }

    fn parse_zoned(&self, raw: &str) -> Option<DateTime<Tz>> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .or_else(|| {
                ZONED_FORMATS
                    .iter()
                    .find_map(|format| DateTime::parse_from_str(raw, format).ok())
            })
            .map(|parsed| parsed.with_timezone(&self.timezone.tz()))
    }

    fn parse_day_first(&self, raw: &str) -> Option<DateTime<Tz>> {
        DAY_FIRST_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .and_then(|naive| self.timezone.from_local(naive))
    }

    fn parse_clock(&self, raw: &str, now: DateTime<Utc>) -> Option<DateTime<Tz>> {
        let time = NaiveTime::parse_from_str(raw, CLOCK_FORMAT).ok()?;
        let today: NaiveDate = self.timezone.localize(now).date_naive();
        self.timezone.from_local(today.and_time(time))
    }

    /// Parse the first candidate that any strategy accepts
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Timestamp`] when no candidate parses.
    pub fn parse(
        &self,
        candidates: &[String],
        now: DateTime<Utc>,
    ) -> Result<DateTime<Tz>, ApplicationError> {
        for raw in candidates {
            if let Some(parsed) = self.parse_one(raw, now) {
                debug!(raw = %raw, parsed = %parsed, "Resolved source timestamp");
                return Ok(parsed);
            }
            debug!(raw = %raw, "Timestamp candidate not recognized");
        }

        Err(ApplicationError::Timestamp(if candidates.is_empty() {
            "no timestamp reported".to_string()
        } else {
            format!("unrecognized timestamp: {}", candidates.join(" | "))
        }))
    }

    /// Reject observations outside the freshness window
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::StaleData`] when `observed_at` is older
    /// than the maximum age or further ahead than the future tolerance.
    pub fn check_freshness(
        &self,
        observed_at: DateTime<Tz>,
        now: DateTime<Utc>,
    ) -> Result<(), ApplicationError> {
        let age = now - observed_at.with_timezone(&Utc);

        if age > self.window.max_age {
            warn!(age_minutes = age.num_minutes(), "Observation too old");
            return Err(ApplicationError::StaleData(format!(
                "observation is {} minutes old",
                age.num_minutes()
            )));
        }
        if age < -self.window.future_tolerance {
            warn!(ahead_minutes = -age.num_minutes(), "Observation dated in the future");
            return Err(ApplicationError::StaleData(format!(
                "observation is {} minutes in the future",
                -age.num_minutes()
            )));
        }

        Ok(())
    }

    /// Parse the candidates and check freshness in one step
    ///
    /// # Errors
    ///
    /// See [`Self::parse`] and [`Self::check_freshness`].
    pub fn resolve(
        &self,
        candidates: &[String],
        now: DateTime<Utc>,
    ) -> Result<DateTime<Tz>, ApplicationError> {
        let observed_at = self.parse(candidates, now)?;
        self.check_freshness(observed_at, now)?;
        Ok(observed_at)
    }
}
