//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the weather source adapter, the voice document renderer,
//! configuration loading, logging setup and the refresh scheduler.

pub mod adapters;
pub mod config;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod telemetry;
pub mod validation;

pub use adapters::*;
pub use config::{
    AppConfig, BulletinConfig, ServerConfig, StationFeedAppConfig, WeatherConfig, WeatherProvider,
};
pub use scheduled_tasks::create_bulletin_refresh_task;
pub use scheduler::{RefreshJob, RefreshScheduler, RefreshStats, SchedulerError};
pub use telemetry::{LogFormat, TelemetryConfig, init_telemetry};
pub use validation::{ConfigValidator, ConfigWarning, WarningSeverity};
