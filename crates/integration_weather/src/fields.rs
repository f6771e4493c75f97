//! Per-provider field resolution
//!
//! Station feeds name the same quantity differently (`ta`, `temperatura`,
//! `temp`...). Each provider gets one [`FieldTable`] listing the accepted
//! keys per logical field, highest priority first. Consumers only ever ask
//! the table, so supporting a new feed means adding a table.

use domain::{RawObservation, WeatherCode};
use serde_json::{Map, Value};

/// A JSON object record as returned by a station feed
pub type Record = Map<String, Value>;

/// Ordered near-synonym keys for every field a station record may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTable {
    /// Station display name
    pub name: &'static [&'static str],
    /// Air temperature (°C)
    pub temperature: &'static [&'static str],
    /// Apparent temperature (°C)
    pub apparent_temperature: &'static [&'static str],
    /// Relative humidity (%)
    pub humidity: &'static [&'static str],
    /// WMO weather code
    pub weather_code: &'static [&'static str],
    /// Observation time
    pub timestamp: &'static [&'static str],
}

impl FieldTable {
    /// AEMET-style conventional observation records
    pub const AEMET: Self = Self {
        name: &["ubi", "nombre", "estacion", "name"],
        temperature: &["ta", "temperatura", "temp", "temperature"],
        apparent_temperature: &["st", "sensacion_termica", "apparent_temperature"],
        humidity: &["hr", "humedad", "humidity"],
        weather_code: &["weather_code", "codigo"],
        timestamp: &["fint", "fecha_hora", "fecha", "hora", "time"],
    };

    /// First non-blank string under any of `keys`
    #[must_use]
    pub fn text(record: &Record, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| record.get(*key))
            .filter_map(value_as_text)
            .find(|text| !text.is_empty())
    }

    /// Every non-blank string under `keys`, in key order
    #[must_use]
    pub fn texts(record: &Record, keys: &[&str]) -> Vec<String> {
        keys.iter()
            .filter_map(|key| record.get(*key))
            .filter_map(value_as_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// First numeric value under any of `keys`
    ///
    /// Accepts JSON numbers and numeric strings with either decimal separator.
    #[must_use]
    pub fn number(record: &Record, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .filter_map(|key| record.get(*key))
            .find_map(value_as_number)
    }

    /// Station name of a record
    #[must_use]
    pub fn station_name(&self, record: &Record) -> Option<String> {
        Self::text(record, self.name)
    }

    /// Current-conditions view of a record
    #[must_use]
    pub fn observation(&self, record: &Record) -> RawObservation {
        let weather_code = Self::number(record, self.weather_code)
            .filter(|code| code.fract().abs() < f64::EPSILON && (0.0..=255.0).contains(code))
            .map(|code| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let code = code as u8;
                WeatherCode::new(code)
            });

        RawObservation {
            temperature: Self::number(record, self.temperature),
            apparent_temperature: Self::number(record, self.apparent_temperature),
            humidity: Self::number(record, self.humidity),
            weather_code,
            source_timestamps: Self::texts(record, self.timestamp),
        }
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => unreachable!("not an object: {other}"),
        }
    }

    #[test]
    fn text_prefers_earlier_keys() {
        let rec = record(json!({"nombre": "Retiro", "ubi": "MADRID RETIRO"}));
        assert_eq!(
            FieldTable::AEMET.station_name(&rec),
            Some("MADRID RETIRO".to_string())
        );
    }

    #[test]
    fn text_skips_blank_values() {
        let rec = record(json!({"ubi": "   ", "nombre": "Retiro"}));
        assert_eq!(FieldTable::AEMET.station_name(&rec), Some("Retiro".to_string()));
    }

    #[test]
    fn number_accepts_numeric_strings() {
        let rec = record(json!({"temperatura": "17,5"}));
        assert_eq!(FieldTable::number(&rec, FieldTable::AEMET.temperature), Some(17.5));
    }

    #[test]
    fn number_falls_through_unparseable_values() {
        let rec = record(json!({"ta": "n/d", "temp": 12}));
        assert_eq!(FieldTable::number(&rec, FieldTable::AEMET.temperature), Some(12.0));
    }

    #[test]
    fn observation_collects_all_timestamp_candidates() {
        let rec = record(json!({
            "ubi": "MADRID RETIRO",
            "ta": 21.4,
            "hr": 40,
            "fint": "2024-15-05",
            "fecha": "15/05/2024 14:30"
        }));
        let obs = FieldTable::AEMET.observation(&rec);
        assert_eq!(obs.temperature, Some(21.4));
        assert_eq!(obs.humidity, Some(40.0));
        assert!(obs.apparent_temperature.is_none());
        assert!(obs.weather_code.is_none());
        assert_eq!(obs.source_timestamps, vec!["2024-15-05", "15/05/2024 14:30"]);
    }

    #[test]
    fn observation_ignores_fractional_weather_codes() {
        let rec = record(json!({"weather_code": 2.5}));
        assert!(FieldTable::AEMET.observation(&rec).weather_code.is_none());

        let rec = record(json!({"weather_code": 61}));
        assert_eq!(
            FieldTable::AEMET.observation(&rec).weather_code,
            Some(WeatherCode::new(61))
        );
    }
}
