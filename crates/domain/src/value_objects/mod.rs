//! Value Objects - Immutable, identity-less domain primitives

mod day_part;
mod geo_location;
mod timezone;
mod weather_code;

pub use day_part::DayPart;
pub use geo_location::GeoLocation;
pub use timezone::Timezone;
pub use weather_code::WeatherCode;
