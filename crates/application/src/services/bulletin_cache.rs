//! Single-flight bulletin cache
//!
//! Holds the last rendered document. At most one pipeline run is in flight
//! at any time; concurrent callers await the same run, which is a spawned
//! task and finishes even if nobody is waiting for it. A failed run never
//! replaces a good entry, and a degraded entry is only stored when there is
//! nothing better to serve.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Duration;
use domain::CacheEntry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::ApplicationError;
use crate::ports::PayloadRendererPort;
use crate::services::bulletin_service::BulletinService;

/// Default lifetime of a cached document
pub const DEFAULT_TTL_MINUTES: i64 = 65;

type RefreshOutcome = Result<Arc<CacheEntry>, ApplicationError>;
type InFlight = Shared<BoxFuture<'static, RefreshOutcome>>;

struct CacheState {
    entry: ArcSwapOption<CacheEntry>,
    in_flight: Mutex<Option<InFlight>>,
    service: BulletinService,
    renderer: Arc<dyn PayloadRendererPort>,
    clock: Clock,
}

impl CacheState {
    async fn run_pipeline(&self) -> RefreshOutcome {
        match self.service.compose().await {
            Ok(script) => {
                let payload = self.renderer.render(&script);
                let entry = Arc::new(CacheEntry::fresh(payload, (self.clock)()));
                self.entry.store(Some(Arc::clone(&entry)));
                info!("Bulletin cache refreshed");
                Ok(entry)
            },
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "Bulletin refresh failed");
                let has_good_entry = self
                    .entry
                    .load_full()
                    .is_some_and(|entry| !entry.is_degraded);
                if !has_good_entry {
                    self.store_degraded(Some(&err));
                }
                Err(err)
            },
        }
    }

    fn store_degraded(&self, error: Option<&ApplicationError>) -> Arc<CacheEntry> {
        let script = self.service.degraded(error);
        let entry = Arc::new(CacheEntry::degraded(
            self.renderer.render(&script),
            (self.clock)(),
        ));
        self.entry.store(Some(Arc::clone(&entry)));
        debug!("Stored degraded bulletin");
        entry
    }
}

/// Empties the in-flight slot when a run ends, panics included
struct ClearInFlight(Arc<CacheState>);

impl Drop for ClearInFlight {
    fn drop(&mut self) {
        self.0.in_flight.lock().take();
    }
}

/// Cache of the rendered bulletin document
pub struct BulletinCache {
    state: Arc<CacheState>,
    ttl: Duration,
}

impl std::fmt::Debug for BulletinCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulletinCache")
            .field("ttl_minutes", &self.ttl.num_minutes())
            .field("has_entry", &self.state.entry.load_full().is_some())
            .finish_non_exhaustive()
    }
}

impl BulletinCache {
    /// Create an empty cache; it shares the service's clock
    #[must_use]
    pub fn new(
        service: BulletinService,
        renderer: Arc<dyn PayloadRendererPort>,
        ttl: Duration,
    ) -> Self {
        let clock = service.clock();
        Self {
            state: Arc::new(CacheState {
                entry: ArcSwapOption::empty(),
                in_flight: Mutex::new(None),
                service,
                renderer,
                clock,
            }),
            ttl,
        }
    }

    /// Entry lifetime
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// MIME type of the cached document
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.state.renderer.content_type()
    }

    /// Current entry without triggering any refresh
    #[must_use]
    pub fn peek(&self) -> Option<Arc<CacheEntry>> {
        self.state.entry.load_full()
    }

    /// Whether an in-flight run exists right now
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.in_flight.lock().is_some()
    }

    /// Run the pipeline, or join the run already in flight
    ///
    /// The run is a spawned task: it completes and clears the in-flight slot
    /// even when every caller stops waiting.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error; the cache then holds either the previous
    /// good entry or a degraded one.
    pub async fn refresh(&self) -> RefreshOutcome {
        let flight = {
            let mut slot = self.state.in_flight.lock();
            if let Some(flight) = slot.as_ref() {
                debug!("Joining in-flight refresh");
                flight.clone()
            } else {
                let state = Arc::clone(&self.state);
                let handle = tokio::spawn(async move {
                    let _clear = ClearInFlight(Arc::clone(&state));
                    state.run_pipeline().await
                });
                let flight = async move {
                    handle.await.unwrap_or_else(|e| {
                        Err(ApplicationError::Internal(format!("refresh task failed: {e}")))
                    })
                }
                .boxed()
                .shared();
                *slot = Some(flight.clone());
                flight
            }
        };
        flight.await
    }

    /// Entry to serve, refreshing first when missing or expired
    ///
    /// Never fails: a failed refresh leaves the previous entry in place, and
    /// an empty cache gets a degraded entry.
    pub async fn read(&self) -> Arc<CacheEntry> {
        let now = (self.state.clock)();
        let needs_refresh = self
            .state
            .entry
            .load_full()
            .is_none_or(|entry| entry.is_expired(now, self.ttl));

        if needs_refresh {
            debug!("Cache empty or expired, refreshing");
            if let Err(err) = self.refresh().await {
                debug!(error = %err, "Serving previous entry after failed refresh");
            }
        }

        self.state
            .entry
            .load_full()
            .unwrap_or_else(|| self.state.store_degraded(None))
    }
}
