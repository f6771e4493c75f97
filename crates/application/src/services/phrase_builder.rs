//! Spanish spoken-text generation
//!
//! Every line that reaches the renderer passes through [`sanitize_line`],
//! including the degraded apology lines.

use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use domain::{DayForecast, RawObservation, Segment, VoiceScript};

use crate::error::ApplicationError;

/// Longest line handed to the renderer, in characters
pub const MAX_LINE_CHARS: usize = 240;

/// First line of a degraded bulletin
pub const APOLOGY_LINE: &str =
    "Lo sentimos, la información meteorológica no está disponible en este momento.";

/// Collapse whitespace runs to one space, trim, and cap the length
#[must_use]
pub fn sanitize_line(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_LINE_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Spanish weekday name
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// Header spoken before the segments of a day
#[must_use]
pub fn day_header(offset: u32, date: NaiveDate) -> String {
    match offset {
        0 => "Hoy.".to_string(),
        1 => "Mañana.".to_string(),
        2 => "Pasado mañana.".to_string(),
        _ => format!("El {}.", weekday_name(date.weekday())),
    }
}

/// Label introducing a segment
#[must_use]
pub const fn moment_label(segment: &Segment) -> &'static str {
    if segment.is_current {
        return "Ahora";
    }
    match segment.part {
        domain::DayPart::Madrugada => "Por la madrugada",
        domain::DayPart::Manana => "Por la mañana",
        domain::DayPart::Tarde => "Por la tarde",
        domain::DayPart::Noche => "Por la noche",
    }
}

#[allow(clippy::cast_possible_truncation)]
fn whole(value: f64) -> i64 {
    value.round() as i64
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Line describing current conditions; `None` when nothing was reported
#[must_use]
pub fn current_line(observation: &RawObservation) -> Option<String> {
    let description = observation
        .weather_code
        .and_then(domain::WeatherCode::description);

    let readings: Vec<String> = [
        observation
            .temperature
            .map(|t| format!("temperatura {} grados", whole(t))),
        observation
            .apparent_temperature
            .map(|t| format!("sensación térmica {} grados", whole(t))),
        observation
            .humidity
            .map(|h| format!("humedad {} por ciento", whole(h))),
    ]
    .into_iter()
    .flatten()
    .collect();

    if description.is_none() && readings.is_empty() {
        return None;
    }

    let mut line = String::from("Ahora:");
    if let Some(description) = description {
        line.push_str(&format!(" {description}."));
    }
    if !readings.is_empty() {
        line.push_str(&format!(" {}.", capitalize_first(&readings.join(", "))));
    }
    Some(line)
}

/// Line for one forecast segment
#[must_use]
pub fn segment_line(segment: &Segment) -> String {
    let mut line = format!("{}:", moment_label(segment));
    if !segment.description.is_empty() {
        line.push_str(&format!(" {}.", segment.description));
    }
    if let Some(range) = segment.temperature {
        line.push_str(&format!(" Entre {} y {} grados.", range.min, range.max));
    }
    if let Some(humidity) = segment.humidity_avg {
        line.push_str(&format!(" Humedad {humidity} por ciento."));
    }
    line
}

/// Short spoken reason for a failure; never includes upstream payloads
#[must_use]
pub const fn failure_reason(error: &ApplicationError) -> &'static str {
    match error {
        ApplicationError::Upstream { .. } => "el servicio meteorológico no responde",
        ApplicationError::Parse(_) => "respuesta no válida",
        ApplicationError::NotFound(_) => "estación no encontrada",
        ApplicationError::Timestamp(_) => "hora de los datos desconocida",
        ApplicationError::StaleData(_) => "datos desactualizados",
        ApplicationError::Configuration(_) => "configuración incompleta",
        ApplicationError::Internal(_) => "error interno",
    }
}

/// Assembles the ordered lines of a bulletin
#[derive(Debug, Clone, Default)]
pub struct PhraseBuilder {
    redirect_url: Option<String>,
}

impl PhraseBuilder {
    /// Create a builder; `redirect_url` is attached to every script
    #[must_use]
    pub fn new(redirect_url: Option<String>) -> Self {
        Self {
            redirect_url: redirect_url.filter(|url| !url.trim().is_empty()),
        }
    }

    /// Full bulletin: location, optional current conditions, per-day
    /// forecast and the update time
    #[must_use]
    pub fn build(
        &self,
        location: &str,
        current: Option<&RawObservation>,
        days: &[DayForecast],
        updated_at: DateTime<Tz>,
    ) -> VoiceScript {
        let mut lines = vec![format!("El tiempo en {}.", location.trim())];

        if let Some(line) = current.and_then(current_line) {
            lines.push(line);
        }

        for day in days {
            lines.push(day_header(day.offset, day.date));
            lines.extend(day.segments.iter().map(segment_line));
        }

        lines.push(format!("Actualizado {}.", updated_at.format("%H:%M")));
        self.finish(lines)
    }

    /// Apology bulletin used when no data can be spoken
    #[must_use]
    pub fn degraded(&self, now: DateTime<Tz>, error: Option<&ApplicationError>) -> VoiceScript {
        let mut lines = vec![
            APOLOGY_LINE.to_string(),
            format!("Son las {}.", now.format("%H:%M")),
        ];
        if let Some(error) = error {
            lines.push(format!("Motivo: {}.", failure_reason(error)));
        }
        self.finish(lines)
    }

    fn finish(&self, lines: Vec<String>) -> VoiceScript {
        VoiceScript {
            lines: lines
                .iter()
                .map(String::as_str)
                .map(sanitize_line)
                .filter(|line| !line.is_empty())
                .collect(),
            redirect_url: self.redirect_url.clone(),
        }
    }
}
