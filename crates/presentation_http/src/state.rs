//! Application state shared across handlers

use std::sync::Arc;

use application::BulletinCache;
use infrastructure::{AppConfig, RefreshScheduler};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Single-flight cache of the rendered bulletin
    pub cache: Arc<BulletinCache>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Background refresh scheduler, absent when not started
    pub scheduler: Option<Arc<RefreshScheduler>>,
}

impl AppState {
    /// State without a scheduler
    #[must_use]
    pub fn new(cache: Arc<BulletinCache>, config: Arc<AppConfig>) -> Self {
        Self {
            cache,
            config,
            scheduler: None,
        }
    }

    /// Attach the background scheduler
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: Arc<RefreshScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }
}
