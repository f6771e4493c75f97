//! WMO weather interpretation codes
//!
//! See <https://open-meteo.com/en/docs> ("WMO Weather interpretation codes").
//! Only codes with a known Spanish wording resolve to a description; anything
//! else yields `None` so callers can drop it instead of speaking a placeholder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw WMO weather code as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherCode(u8);

impl WeatherCode {
    /// Wrap a raw code
    #[must_use]
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Raw numeric value
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Spanish description suitable for speech, if the code is mapped
    #[must_use]
    pub const fn description(self) -> Option<&'static str> {
        let text = match self.0 {
            0 => "cielo despejado",
            1 => "predominantemente despejado",
            2 => "parcialmente nublado",
            3 => "cielo cubierto",
            45 => "niebla",
            48 => "niebla con escarcha",
            51 => "llovizna débil",
            53 => "llovizna moderada",
            55 => "llovizna intensa",
            56 | 57 => "llovizna helada",
            61 => "lluvia débil",
            63 => "lluvia moderada",
            65 => "lluvia intensa",
            66 | 67 => "lluvia helada",
            71 => "nevada débil",
            73 => "nevada moderada",
            75 => "nevada intensa",
            77 => "granizo fino",
            80 => "chubascos débiles",
            81 => "chubascos moderados",
            82 => "chubascos fuertes",
            85 | 86 => "chubascos de nieve",
            95 => "tormenta",
            96 | 99 => "tormenta con granizo",
            _ => return None,
        };
        Some(text)
    }
}

impl From<u8> for WeatherCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
