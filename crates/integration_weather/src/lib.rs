//! Weather data fetchers for meteovoz
//!
//! Two upstream shapes are supported:
//!
//! - [`OpenMeteoClient`] queries the [Open-Meteo](https://open-meteo.com) forecast
//!   API for a single fixed point and returns current conditions plus an hourly
//!   series in the target timezone.
//! - [`StationFeedClient`] downloads a multi-station observation feed, picks the
//!   station whose name best matches a keyword set ([`StationSelector`]) and
//!   resolves its fields through a per-provider [`FieldTable`].
//!
//! # Architecture
//!
//! Both clients implement [`WeatherClient`] and perform exactly one outbound
//! request per call, bounded by the configured timeout. They return a
//! [`domain::WeatherSnapshot`] with timestamps left unparsed for the
//! application layer to resolve.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_weather::{OpenMeteoClient, OpenMeteoConfig, WeatherClient};
//!
//! let client = OpenMeteoClient::new(OpenMeteoConfig::default())?;
//! let snapshot = client.fetch_snapshot().await?;
//! ```

mod client;
mod config;
mod error;
mod fields;
mod models;
mod station;

pub use client::{OpenMeteoClient, WeatherClient};
pub use config::{OpenMeteoConfig, StationFeedConfig};
pub use error::WeatherError;
pub use fields::FieldTable;
pub use station::{StationCandidate, StationFeedClient, StationSelector};
