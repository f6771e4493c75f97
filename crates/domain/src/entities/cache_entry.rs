//! The single shared rendered bulletin

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A rendered payload and when it was produced
///
/// Entries are immutable. The cache replaces the whole entry atomically,
/// so readers never observe a half-updated payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Document handed to the voice consumer
    pub rendered_payload: String,
    /// When this entry was created
    pub created_at: DateTime<Utc>,
    /// True for the synthesized fallback shown when no good data exists
    pub is_degraded: bool,
}

impl CacheEntry {
    /// Entry built from a successful refresh
    #[must_use]
    pub const fn fresh(rendered_payload: String, created_at: DateTime<Utc>) -> Self {
        Self {
            rendered_payload,
            created_at,
            is_degraded: false,
        }
    }

    /// Entry built from the fallback rendering
    #[must_use]
    pub const fn degraded(rendered_payload: String, created_at: DateTime<Utc>) -> Self {
        Self {
            rendered_payload,
            created_at,
            is_degraded: true,
        }
    }

    /// Age of the entry at `now`
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// Whether the entry is older than `ttl` at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) > ttl
    }
}
