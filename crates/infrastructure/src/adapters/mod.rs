//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod voice_document;
mod weather_adapter;

pub use voice_document::{VOICE_DOCUMENT_CONTENT_TYPE, VoiceDocumentRenderer};
pub use weather_adapter::WeatherAdapter;
