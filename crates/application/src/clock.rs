//! Injectable wall clock

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of "now" shared by the pipeline and the cache
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The real system clock
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// A clock frozen at `instant`
#[must_use]
pub fn fixed_clock(instant: DateTime<Utc>) -> Clock {
    Arc::new(move || instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_never_moves() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        let clock = fixed_clock(instant);
        assert_eq!(clock(), instant);
        assert_eq!(clock(), instant);
    }

    #[test]
    fn system_clock_is_close_to_now() {
        let clock = system_clock();
        let delta = Utc::now() - clock();
        assert!(delta.num_seconds().abs() < 5);
    }
}
