//! Timezone value object
//!
//! Wraps a validated IANA zone from `chrono-tz`. Every local-time decision in
//! the bulletin (day parts, "today", the `Actualizado` line) is taken in this
//! zone, never in the host's zone.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// A validated IANA timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timezone(Tz);

impl Timezone {
    /// Parse an IANA timezone name such as `Europe/Madrid`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` for names unknown to the tz database.
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        Tz::from_str(name.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
    }

    /// Wrap an already-resolved zone
    #[must_use]
    pub const fn from_tz(tz: Tz) -> Self {
        Self(tz)
    }

    /// The underlying `chrono-tz` zone
    #[must_use]
    pub const fn tz(&self) -> Tz {
        self.0
    }

    /// IANA name of the zone
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Convert an instant to local time in this zone
    #[must_use]
    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.0)
    }

    /// Convert a naive local datetime to an instant in this zone
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant;
    /// nonexistent local times (DST spring-forward gap) yield `None`.
    #[must_use]
    pub fn from_local(&self, naive: chrono::NaiveDateTime) -> Option<DateTime<Tz>> {
        self.0.from_local_datetime(&naive).earliest()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Europe::Madrid)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Timezone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timezone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name).map_err(serde::de::Error::custom)
    }
}
