//! Week windows for quota accounting.
//!
//! A window runs from Monday 00:00 local time up to, but not including,
//! the following Monday 00:00. Bounds are resolved in the caller's time
//! zone and stored as UTC instants, which is how claim timestamps are
//! compared in the store.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` covering one local calendar week.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    /// Most recent Monday 00:00 at or before the reference instant.
    pub start: DateTime<Utc>,
    /// The following Monday 00:00.
    pub end: DateTime<Utc>,
}

impl WeekWindow {
    /// Window containing `now`, with Monday midnight resolved in `now`'s zone.
    ///
    /// ```
    /// use chrono::{FixedOffset, TimeZone, Utc};
    /// use coupon_arcade::rewards::WeekWindow;
    ///
    /// // Wednesday 2024-05-15 10:00 at UTC+2
    /// let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    /// let now = tz.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap();
    ///
    /// let window = WeekWindow::containing(&now);
    /// assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 12, 22, 0, 0).unwrap());
    /// assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 5, 19, 22, 0, 0).unwrap());
    /// ```
    #[must_use]
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let next_monday = monday + Duration::days(7);

        Self {
            start: local_midnight(&tz, monday),
            end: local_midnight(&tz, next_monday),
        }
    }

    /// Check whether `instant` falls inside the window.
    #[must_use]
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let instant = instant.with_timezone(&Utc);
        self.start <= instant && instant < self.end
    }

    /// Instant the quota resets: the start of the next window.
    ///
    /// At exactly Monday 00:00 the current window has just begun, so this
    /// is a full week away.
    #[must_use]
    pub fn next_reset(&self) -> DateTime<Utc> {
        self.end
    }
}

/// UTC instant of 00:00 on `date` in `tz`.
///
/// Where midnight is skipped by a DST jump the first valid instant of the
/// day is used; where it is repeated the earlier one wins.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight: NaiveDateTime = date.and_time(chrono::NaiveTime::MIN);

    (0..=2)
        .find_map(|hours| {
            tz.from_local_datetime(&(midnight + Duration::hours(hours)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveTime};

    /// UTC-3 zone with a UTC-2 summer. Summer starts by skipping Monday
    /// 2024-10-07 00:00-01:00 and ends by repeating Monday 2025-02-17
    /// 00:00-01:00.
    #[derive(Clone, Copy, Debug)]
    struct MidnightDst;

    impl MidnightDst {
        fn standard() -> FixedOffset {
            FixedOffset::west_opt(3 * 3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::west_opt(2 * 3600).unwrap()
        }

        fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
        }
    }

    impl TimeZone for MidnightDst {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            MidnightDst
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let gap = Self::at(2024, 10, 7, 0)..Self::at(2024, 10, 7, 1);
            let repeat = Self::at(2025, 2, 17, 0)..Self::at(2025, 2, 17, 1);

            if gap.contains(local) {
                LocalResult::None
            } else if repeat.contains(local) {
                LocalResult::Ambiguous(Self::summer(), Self::standard())
            } else if (gap.end..repeat.start).contains(local) {
                LocalResult::Single(Self::summer())
            } else {
                LocalResult::Single(Self::standard())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if (Self::at(2024, 10, 7, 3)..Self::at(2025, 2, 17, 3)).contains(utc) {
                Self::summer()
            } else {
                Self::standard()
            }
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_window_from_midweek() {
        // Thursday
        let window = WeekWindow::containing(&utc(2024, 5, 16, 13, 30, 0));
        assert_eq!(window.start, utc(2024, 5, 13, 0, 0, 0));
        assert_eq!(window.end, utc(2024, 5, 20, 0, 0, 0));
    }

    #[test]
    fn test_sunday_belongs_to_week_started_six_days_earlier() {
        let window = WeekWindow::containing(&utc(2024, 5, 19, 23, 59, 59));
        assert_eq!(window.start, utc(2024, 5, 13, 0, 0, 0));
    }

    #[test]
    fn test_monday_midnight_starts_new_window() {
        let now = utc(2024, 5, 20, 0, 0, 0);
        let window = WeekWindow::containing(&now);
        assert_eq!(window.start, now);
        assert_eq!(window.next_reset(), utc(2024, 5, 27, 0, 0, 0));
    }

    #[test]
    fn test_sunday_claim_outside_monday_window() {
        let claim = utc(2024, 5, 19, 23, 59, 59);
        let window = WeekWindow::containing(&utc(2024, 5, 20, 0, 0, 1));

        assert!(!window.contains(&claim));
        assert!(window.contains(&utc(2024, 5, 20, 0, 0, 0)));
        assert!(!window.contains(&window.end));
    }

    #[test]
    fn test_local_offset_shifts_boundary() {
        // Monday 01:00 at UTC+3 is still Sunday in UTC
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 5, 20, 1, 0, 0).unwrap();

        let window = WeekWindow::containing(&now);
        assert_eq!(window.start, utc(2024, 5, 19, 21, 0, 0));
        assert!(window.contains(&utc(2024, 5, 19, 22, 0, 0)));
    }

    #[test]
    fn test_skipped_midnight_starts_at_first_valid_instant() {
        let now = MidnightDst.with_ymd_and_hms(2024, 10, 9, 12, 0, 0).unwrap();

        let window = WeekWindow::containing(&now);

        // Monday 00:00 does not exist; 01:00 at UTC-2 is the first instant of the day
        assert_eq!(window.start, utc(2024, 10, 7, 3, 0, 0));
        assert_eq!(window.end, utc(2024, 10, 14, 2, 0, 0));
        assert!(window.contains(&now));
    }

    #[test]
    fn test_repeated_midnight_takes_earlier_instant() {
        let now = MidnightDst.with_ymd_and_hms(2025, 2, 19, 12, 0, 0).unwrap();

        let window = WeekWindow::containing(&now);

        // 00:00 happens at UTC-2 and again at UTC-3; the first one opens the week
        assert_eq!(window.start, utc(2025, 2, 17, 2, 0, 0));
        assert_eq!(window.end, utc(2025, 2, 24, 3, 0, 0));
        assert!(window.contains(&now));
    }

    #[test]
    fn test_window_serde() {
        let window = WeekWindow::containing(&utc(2024, 5, 16, 0, 0, 0));
        let json = serde_json::to_string(&window).unwrap();
        let back: WeekWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(window, back);
    }
}
