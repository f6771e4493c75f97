//! Weather data port
//!
//! Defines how the pipeline obtains one raw snapshot from the configured
//! provider.

use async_trait::async_trait;
use domain::WeatherSnapshot;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather data retrieval
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Fetch the current observation and hourly forecast
    ///
    /// Performs exactly one bounded upstream request.
    async fn fetch_snapshot(&self) -> Result<WeatherSnapshot, ApplicationError>;

    /// Short provider identifier for logs
    fn provider_name(&self) -> &'static str;
}
