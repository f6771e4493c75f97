//! Logging initialization
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a text or
//! JSON formatter.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryConfig, TelemetryError, build_filter, init_telemetry};
