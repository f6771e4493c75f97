//! Open-Meteo response models
//!
//! Only the fields the bulletin needs are modelled. Value arrays in the
//! hourly section may contain `null` for hours the model did not produce.

use serde::Deserialize;

/// Top-level `/forecast` response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    /// Offset of the requested timezone at generation time
    #[serde(default)]
    pub utc_offset_seconds: i32,
    /// Echo of the requested timezone
    #[serde(default)]
    pub timezone: Option<String>,
    pub current: Option<CurrentData>,
    pub hourly: Option<HourlyData>,
}

/// `current` section
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentData {
    /// Naive local time, e.g. `2024-05-15T14:15`
    pub time: String,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub weather_code: Option<u8>,
}

/// `hourly` section, column-oriented
#[derive(Debug, Deserialize)]
pub(crate) struct HourlyData {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<u8>>,
}
