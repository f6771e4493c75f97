//! Application services
//!
//! Pure bulletin logic (timestamps, segmentation, phrasing) plus the
//! pipeline and the cache that drives it.

pub mod bulletin_cache;
pub mod bulletin_service;
pub mod phrase_builder;
pub mod segmenter;
pub mod timestamp_resolver;

pub use bulletin_cache::{BulletinCache, DEFAULT_TTL_MINUTES};
pub use bulletin_service::{BulletinService, BulletinSettings};
pub use phrase_builder::{APOLOGY_LINE, MAX_LINE_CHARS, PhraseBuilder, sanitize_line};
pub use segmenter::{SegmenterOptions, segment_forecast};
pub use timestamp_resolver::{FreshnessWindow, TimestampResolver};
