//! Day-index arithmetic for check-in bookkeeping.
//!
//! The site rolls its check-in day over at midnight UTC+8, so the day index
//! is the number of whole days since the epoch shifted by eight hours.
//! Outcomes are keyed by this index; two timestamps on the same site-local
//! calendar day map to the same index.

/// Seconds of offset to the site's day boundary (UTC+8).
const DAY_BOUNDARY_OFFSET_SECS: i64 = 8 * 3600;

const SECS_PER_DAY: i64 = 86_400;

/// Converts a unix timestamp (seconds) to the site-local day index.
#[must_use]
pub fn day_index(unix_seconds: i64) -> i64 {
    (unix_seconds + DAY_BOUNDARY_OFFSET_SECS).div_euclid(SECS_PER_DAY)
}

/// The day index for the current wall clock.
#[must_use]
pub fn today() -> i64 {
    day_index(chrono::Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_day_zero() {
        // 1970-01-01 00:00 UTC is 08:00 in UTC+8, still day 0.
        assert_eq!(day_index(0), 0);
    }

    #[test]
    fn rolls_over_at_utc_16() {
        // 15:59:59 UTC is 23:59:59 UTC+8, the last second of day 0.
        assert_eq!(day_index(16 * 3600 - 1), 0);
        // 16:00:00 UTC is midnight UTC+8, so day 1 begins.
        assert_eq!(day_index(16 * 3600), 1);
    }

    #[test]
    fn same_local_day_maps_to_same_index() {
        let morning = 20_000 * SECS_PER_DAY + 3600;
        let evening = 20_000 * SECS_PER_DAY + 15 * 3600;
        assert_eq!(day_index(morning), day_index(evening));
    }

    #[test]
    fn pre_epoch_timestamps_floor_correctly() {
        assert_eq!(day_index(-DAY_BOUNDARY_OFFSET_SECS - 1), -1);
    }
}
