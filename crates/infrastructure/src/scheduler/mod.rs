//! Cron trigger for the background bulletin refresh
//!
//! One job on a `tokio-cron-scheduler` instance. Each run's outcome is kept
//! in a small log that `/ready` reports.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, info, instrument, warn};

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid cron expression
    #[error("Invalid cron expression: {0}")]
    InvalidCronExpression(String),

    /// Error from the underlying job scheduler
    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Scheduler(err.to_string())
    }
}

/// Body of a scheduled refresh; `Err` carries a message for the run log
pub type RefreshJob = Arc<dyn Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// Run history of the refresh job as reported on `/ready`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshStats {
    /// Schedule of the job
    pub cron: String,
    /// Completed runs
    pub runs: u64,
    /// Runs that ended in an error
    pub failures: u64,
    /// Failures since the last success
    pub consecutive_failures: u64,
    /// End of the latest run
    pub last_run: Option<DateTime<Utc>>,
    /// End of the latest successful run
    pub last_success: Option<DateTime<Utc>>,
    /// Message of the latest failure, cleared by a success
    pub last_error: Option<String>,
}

impl RefreshStats {
    fn record(&mut self, outcome: &Result<(), String>, at: DateTime<Utc>) {
        self.runs += 1;
        self.last_run = Some(at);
        match outcome {
            Ok(()) => {
                self.consecutive_failures = 0;
                self.last_success = Some(at);
                self.last_error = None;
            },
            Err(e) => {
                self.failures += 1;
                self.consecutive_failures += 1;
                self.last_error = Some(e.clone());
            },
        }
    }
}

/// Validate a six-field cron expression (sec min hour day month weekday)
pub fn validate_cron(cron_expression: &str) -> Result<(), SchedulerError> {
    cron_expression
        .parse::<cron::Schedule>()
        .map(|_| ())
        .map_err(|e| SchedulerError::InvalidCronExpression(format!("{cron_expression}: {e}")))
}

/// Runs the refresh job on its cron schedule
pub struct RefreshScheduler {
    scheduler: AsyncMutex<JobScheduler>,
    stats: Arc<Mutex<RefreshStats>>,
    running: AtomicBool,
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("cron", &self.stats.lock().cron)
            .field("running", &self.running.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl RefreshScheduler {
    /// Register `job` on `cron_expression`; nothing runs until [`start`](Self::start)
    ///
    /// Failures returned by the job are logged and recorded, never propagated.
    #[instrument(skip(job))]
    pub async fn new(cron_expression: &str, job: RefreshJob) -> Result<Self, SchedulerError> {
        validate_cron(cron_expression)?;

        let stats = Arc::new(Mutex::new(RefreshStats {
            cron: cron_expression.to_string(),
            ..RefreshStats::default()
        }));

        let log = Arc::clone(&stats);
        let cron_job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let log = Arc::clone(&log);
            let run = job();
            Box::pin(async move {
                debug!("Scheduled refresh starting");
                let outcome = run.await;
                if let Err(e) = &outcome {
                    warn!(error = %e, "Scheduled refresh failed");
                }
                log.lock().record(&outcome, Utc::now());
            })
        })
        .map_err(|e| SchedulerError::InvalidCronExpression(e.to_string()))?;

        let scheduler = JobScheduler::new().await?;
        scheduler.add(cron_job).await?;
        info!(cron = %cron_expression, "Refresh job scheduled");

        Ok(Self {
            scheduler: AsyncMutex::new(scheduler),
            stats,
            running: AtomicBool::new(false),
        })
    }

    /// Start firing the job
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Err(e) = self.scheduler.lock().await.start().await {
            self.running.store(false, Ordering::SeqCst);
            return Err(e.into());
        }
        info!("Refresh scheduler started");
        Ok(())
    }

    /// Stop firing the job; a run already started is not interrupted
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        self.scheduler.lock().await.shutdown().await?;
        info!("Refresh scheduler stopped");
        Ok(())
    }

    /// Whether the job is being fired
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the run history
    #[must_use]
    pub fn stats(&self) -> RefreshStats {
        self.stats.lock().clone()
    }
}
