//! Job body for the scheduled bulletin refresh

use std::sync::Arc;

use application::BulletinCache;
use futures::FutureExt;
use tracing::{debug, error};

use crate::scheduler::RefreshJob;

/// Create the refresh job run by [`RefreshScheduler`](crate::scheduler::RefreshScheduler)
///
/// Each run goes through the cache's single-flight refresh, so a tick that
/// overlaps a request-triggered refresh joins it instead of fetching twice.
pub fn create_bulletin_refresh_task(cache: Arc<BulletinCache>) -> RefreshJob {
    Arc::new(move || {
        let cache = Arc::clone(&cache);

        async move {
            debug!("Running scheduled bulletin refresh");

            match cache.refresh().await {
                Ok(entry) => {
                    debug!(created_at = %entry.created_at, "Scheduled refresh stored a new bulletin");
                    Ok(())
                },
                Err(e) => {
                    error!(error = %e, kind = e.kind(), "Scheduled bulletin refresh failed");
                    Err(format!("Bulletin refresh failed: {e}"))
                },
            }
        }
        .boxed()
    })
}
