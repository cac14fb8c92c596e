//! Identification of the daily puzzle
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, Utc};
use std::fmt;

/// The first day there was a daily puzzle; it is puzzle #1.
const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(d) => d,
    None => panic!("2024-01-01 should be a valid date"),
};

/// Key identifying one day's puzzle.  Always a UTC calendar date, so that
/// everyone gets the same puzzle regardless of their time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct DailyKey(NaiveDate);

impl DailyKey {
    pub(crate) fn new(date: NaiveDate) -> DailyKey {
        DailyKey(date)
    }

    /// Return the key for the current UTC day
    pub(crate) fn today() -> DailyKey {
        DailyKey::for_instant(Utc::now())
    }

    pub(crate) fn for_instant(now: DateTime<Utc>) -> DailyKey {
        DailyKey(now.date_naive())
    }

    /// The string the day's puzzle is generated from: `YYYY-M-D`, with no
    /// zero-padding of the month or day
    pub(crate) fn seed(self) -> String {
        format!("{}-{}-{}", self.0.year(), self.0.month(), self.0.day())
    }

    /// The key under which the day's progress is stored
    pub(crate) fn storage_key(self) -> String {
        format!("daily:{}", self.seed())
    }

    /// The puzzle's sequential number, counting 2024-01-01 as #1.  Days before
    /// then yield zero or negative numbers.
    pub(crate) fn number(self) -> i64 {
        self.0.signed_duration_since(EPOCH).num_days() + 1
    }
}

impl fmt::Display for DailyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.seed())
    }
}

/// Return how long remains from `now` until the next UTC midnight, i.e., until
/// the next puzzle is available
pub(crate) fn time_until_next(now: DateTime<Utc>) -> TimeDelta {
    let tomorrow = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc());
    tomorrow.map_or(TimeDelta::zero(), |t| t - now)
}

/// Format a countdown the way the victory screen shows it, e.g. `"3h 7m 0s"`
pub(crate) fn format_countdown(delta: TimeDelta) -> String {
    let secs = delta.num_seconds().max(0);
    format!(
        "{}h {}m {}s",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2024, 1, 1), "2024-1-1")]
    #[case(date(2025, 3, 7), "2025-3-7")]
    #[case(date(2025, 11, 30), "2025-11-30")]
    #[case(date(2026, 10, 9), "2026-10-9")]
    fn seed_is_unpadded(#[case] d: NaiveDate, #[case] seed: &str) {
        assert_eq!(DailyKey::new(d).seed(), seed);
    }

    #[test]
    fn storage_key() {
        assert_eq!(
            DailyKey::new(date(2025, 2, 3)).storage_key(),
            "daily:2025-2-3"
        );
    }

    #[rstest]
    #[case(date(2024, 1, 1), 1)]
    #[case(date(2024, 1, 2), 2)]
    #[case(date(2024, 12, 31), 366)]
    #[case(date(2025, 1, 1), 367)]
    fn number(#[case] d: NaiveDate, #[case] n: i64) {
        assert_eq!(DailyKey::new(d).number(), n);
    }

    #[test]
    fn today_uses_utc_date() {
        // 23:30 UTC is already the next day in UTC+1, but the key must not care.
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 23, 30, 0).unwrap();
        assert_eq!(DailyKey::for_instant(now).seed(), "2025-6-1");
    }

    #[test]
    fn countdown_to_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 20, 52, 59).unwrap();
        let delta = time_until_next(now);
        assert_eq!(delta.num_seconds(), 3 * 3600 + 7 * 60 + 1);
        assert_eq!(format_countdown(delta), "3h 7m 1s");
    }

    #[test]
    fn countdown_at_midnight() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(format_countdown(time_until_next(now)), "24h 0m 0s");
    }
}
