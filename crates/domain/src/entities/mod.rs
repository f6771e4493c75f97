//! Domain entities - weather data as fetched, aggregated and rendered

mod cache_entry;
mod forecast;
mod observation;
mod voice_script;

pub use cache_entry::CacheEntry;
pub use forecast::{DayForecast, Segment, TemperatureRange};
pub use observation::{HourlyRecord, RawObservation, WeatherSnapshot};
pub use voice_script::VoiceScript;
