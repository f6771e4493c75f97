//! Configuration validation module
//!
//! Provides startup checks for application configuration.

pub mod startup;

pub use startup::{ConfigValidator, ConfigWarning, WarningSeverity};
