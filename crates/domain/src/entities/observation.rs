//! Raw weather data produced by a single fetch

use chrono::DateTime;
use chrono_tz::Tz;

use crate::value_objects::WeatherCode;

/// Current-conditions snapshot as reported by the provider
///
/// The source timestamp is kept unparsed: providers disagree on its format
/// and on the field that carries it, so `source_timestamps` holds every
/// candidate value in the provider's priority order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObservation {
    /// Air temperature in °C
    pub temperature: Option<f64>,
    /// Apparent ("feels like") temperature in °C
    pub apparent_temperature: Option<f64>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
    /// WMO weather code
    pub weather_code: Option<WeatherCode>,
    /// Raw timestamp candidates, highest priority first
    pub source_timestamps: Vec<String>,
}

/// One forecast hour
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    /// Start of the hour in the target local zone
    pub timestamp: DateTime<Tz>,
    /// WMO weather code
    pub weather_code: Option<WeatherCode>,
    /// Air temperature in °C
    pub temperature: Option<f64>,
    /// Relative humidity in percent
    pub humidity: Option<f64>,
}

/// Everything a fetcher returns for one refresh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    /// Name reported by the source (e.g. the selected station)
    pub source_name: Option<String>,
    /// Current conditions, when the source provides them
    pub observation: Option<RawObservation>,
    /// Hourly forecast series, in whatever order the source returned it
    pub hourly: Vec<HourlyRecord>,
}
