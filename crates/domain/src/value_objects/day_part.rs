//! Day part value object
//!
//! A calendar day is split into four fixed windows over local clock hours.
//! The windows are half-open, contiguous and together cover `[0, 24)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// One of the four fixed local-hour windows of a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    /// 00:00 - 05:59
    Madrugada,
    /// 06:00 - 11:59
    Manana,
    /// 12:00 - 17:59
    Tarde,
    /// 18:00 - 23:59
    Noche,
}

impl DayPart {
    /// All day parts in chronological order
    pub const ALL: [Self; 4] = [Self::Madrugada, Self::Manana, Self::Tarde, Self::Noche];

    /// Half-open range of local hours covered by this part
    #[must_use]
    pub const fn hours(self) -> Range<u32> {
        match self {
            Self::Madrugada => 0..6,
            Self::Manana => 6..12,
            Self::Tarde => 12..18,
            Self::Noche => 18..24,
        }
    }

    /// Day part containing the given local hour
    ///
    /// Hours past 23 are treated as night; chrono never produces them.
    #[must_use]
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::Madrugada,
            6..=11 => Self::Manana,
            12..=17 => Self::Tarde,
            _ => Self::Noche,
        }
    }

    /// Whether the local hour falls in this part
    #[must_use]
    pub fn contains(self, hour: u32) -> bool {
        self.hours().contains(&hour)
    }

    /// Spanish name of the part
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Madrugada => "madrugada",
            Self::Manana => "mañana",
            Self::Tarde => "tarde",
            Self::Noche => "noche",
        }
    }
}

impl fmt::Display for DayPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
