//! Aggregated forecast segments

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value_objects::DayPart;

/// Rounded temperature span of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureRange {
    /// Rounded minimum in °C
    pub min: i64,
    /// Rounded maximum in °C
    pub max: i64,
}

/// Aggregate of all hourly records of one day part on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Which window of the day
    pub part: DayPart,
    /// True for the part containing "now" on the current day
    pub is_current: bool,
    /// Spanish description of the dominant weather code, empty when unmapped
    pub description: String,
    /// Temperature span, absent when no record carried a temperature
    pub temperature: Option<TemperatureRange>,
    /// Rounded mean humidity, absent when not requested or not reported
    pub humidity_avg: Option<i64>,
}

impl Segment {
    /// A segment with nothing to say is never rendered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.temperature.is_none()
    }
}

/// Retained segments of one forecast day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayForecast {
    /// Days after today (0 = today)
    pub offset: u32,
    /// Local calendar date
    pub date: NaiveDate,
    /// Non-empty segments in chronological order
    pub segments: Vec<Segment>,
}
