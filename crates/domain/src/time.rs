//! Clock helpers for report timestamps.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// UTC timestamp recorded on reports and step checks.
pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Wall-clock time between two timestamps, zero if `end` precedes `start`.
#[must_use]
pub fn elapsed(start: Timestamp, end: Timestamp) -> Duration {
    (end - start).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        assert!(ts >= before);
        assert!(ts <= Utc::now());
    }

    #[test]
    fn should_measure_elapsed_time_between_timestamps() {
        let start = now();
        let end = start + chrono::Duration::milliseconds(1500);
        assert_eq!(elapsed(start, end), Duration::from_millis(1500));
    }

    #[test]
    fn should_clamp_negative_elapsed_time_to_zero() {
        let start = now();
        let end = start - chrono::Duration::seconds(1);
        assert_eq!(elapsed(start, end), Duration::ZERO);
    }
}
