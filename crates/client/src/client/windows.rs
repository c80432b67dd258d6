//! Reporting query windows.
//!
//! A collection range `[start, now]` is split into day-sized windows, or
//! three-day windows when the range spans a week or more. Windows are
//! contiguous at one-second resolution: each window ends one second before
//! the next begins, and the last one ends exactly at `now`. A remainder of at
//! most one step is queried as a single window.

use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, Utc};
use lastpass_config::constants::{
    DEFAULT_LOOKBACK_HOURS, LASTPASS_TIME_FORMAT, WIDE_WINDOW_DAYS, WIDE_WINDOW_THRESHOLD_DAYS,
};

use crate::models::FetchCursor;

/// One inclusive `[start, end]` reporting range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// `from`/`to` strings in the vendor format and offset.
    pub fn vendor_bounds(&self, offset: FixedOffset) -> (String, String) {
        (
            format_vendor_time(self.start, offset),
            format_vendor_time(self.end, offset),
        )
    }
}

/// Render a timestamp the way the reporting API expects it.
pub fn format_vendor_time(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset)
        .format(LASTPASS_TIME_FORMAT)
        .to_string()
}

/// Where an events fetch starts.
///
/// The checkpoint wins once it exists; otherwise the configured start time,
/// otherwise a fixed lookback from `now`. Never later than `now`.
pub fn resolve_start(
    cursor: &FetchCursor,
    time_start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let start = cursor
        .last_timestamp()
        .or(time_start)
        .unwrap_or_else(|| now - ChronoDuration::hours(DEFAULT_LOOKBACK_HOURS));
    truncate_to_second(start.min(now))
}

/// Split `[start, now]` into reporting windows.
///
/// Returns an empty plan when `start` is after `now`.
pub fn plan_windows(start: DateTime<Utc>, now: DateTime<Utc>) -> Vec<TimeWindow> {
    let start = truncate_to_second(start);
    let now = truncate_to_second(now);
    if start > now {
        return Vec::new();
    }

    let span_days = (now - start).num_days();
    let step_days = if span_days >= WIDE_WINDOW_THRESHOLD_DAYS {
        WIDE_WINDOW_DAYS
    } else {
        1
    };
    let step = ChronoDuration::days(step_days);
    let one_second = ChronoDuration::seconds(1);

    let mut windows = Vec::new();
    let mut window_start = start;
    while window_start <= now {
        let window_end = if now - window_start <= step {
            now
        } else {
            window_start + step - one_second
        };
        windows.push(TimeWindow {
            start: window_start,
            end: window_end,
        });
        window_start = window_end + one_second;
    }
    windows
}

fn truncate_to_second(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts - ChronoDuration::nanoseconds(i64::from(ts.timestamp_subsec_nanos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, TimeZone};
    use lastpass_config::InputType;

    use crate::models::CursorPosition;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_short_range_is_one_window() {
        let now = at(2024, 3, 1, 12, 0, 0);
        let windows = plan_windows(at(2024, 3, 1, 0, 0, 0), now);
        assert_eq!(
            windows,
            vec![TimeWindow {
                start: at(2024, 3, 1, 0, 0, 0),
                end: now
            }]
        );
    }

    #[test]
    fn test_daily_windows_below_threshold() {
        let windows = plan_windows(at(2024, 3, 1, 0, 0, 0), at(2024, 3, 3, 6, 0, 0));
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].end, at(2024, 3, 1, 23, 59, 59));
        assert_eq!(windows[1].start, at(2024, 3, 2, 0, 0, 0));
        assert_eq!(windows[2].end, at(2024, 3, 3, 6, 0, 0));
    }

    #[test]
    fn test_wide_windows_from_seven_days() {
        let windows = plan_windows(at(2024, 3, 1, 0, 0, 0), at(2024, 3, 8, 0, 0, 0));
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].end, at(2024, 3, 3, 23, 59, 59));
        assert_eq!(windows[1].start, at(2024, 3, 4, 0, 0, 0));
        assert_eq!(windows[2].start, at(2024, 3, 7, 0, 0, 0));
        assert_eq!(windows[2].end, at(2024, 3, 8, 0, 0, 0));
    }

    #[test]
    fn test_default_lookback_is_one_window() {
        let now = at(2024, 3, 10, 0, 0, 0);
        let start = resolve_start(&FetchCursor::empty(InputType::Events), None, now);
        assert_eq!(plan_windows(start, now), vec![TimeWindow { start, end: now }]);
    }

    #[test]
    fn test_exact_day_multiple_has_no_one_second_tail() {
        let windows = plan_windows(at(2024, 3, 1, 0, 0, 0), at(2024, 3, 3, 0, 0, 0));
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].end, at(2024, 3, 1, 23, 59, 59));
        assert_eq!(windows[1].start, at(2024, 3, 2, 0, 0, 0));
        assert_eq!(windows[1].end, at(2024, 3, 3, 0, 0, 0));
    }

    #[test]
    fn test_start_after_now_plans_nothing() {
        assert!(plan_windows(at(2024, 3, 2, 0, 0, 0), at(2024, 3, 1, 0, 0, 0)).is_empty());
    }

    #[test]
    fn test_checkpoint_wins_over_time_start() {
        let now = at(2024, 3, 10, 0, 0, 0);
        let cursor = FetchCursor {
            last_seen: Some(CursorPosition::Timestamp(at(2024, 3, 9, 8, 0, 0))),
            ..FetchCursor::empty(InputType::Events)
        };
        let start = resolve_start(&cursor, Some(at(2024, 3, 1, 0, 0, 0)), now);
        assert_eq!(start, at(2024, 3, 9, 8, 0, 0));
    }

    #[test]
    fn test_start_defaults() {
        let now = at(2024, 3, 10, 0, 0, 0);
        let empty = FetchCursor::empty(InputType::Events);
        assert_eq!(
            resolve_start(&empty, Some(at(2024, 3, 1, 0, 0, 0)), now),
            at(2024, 3, 1, 0, 0, 0)
        );
        assert_eq!(resolve_start(&empty, None, now), at(2024, 3, 9, 0, 0, 0));
    }

    #[test]
    fn test_vendor_format_applies_offset() {
        let offset = FixedOffset::east_opt(-5 * 3600).unwrap();
        assert_eq!(
            format_vendor_time(at(2024, 3, 1, 12, 0, 0), offset),
            "2024-03-01 07:00:00"
        );
        assert_eq!(
            format_vendor_time(at(2024, 3, 1, 12, 0, 0), Utc.fix()),
            "2024-03-01 12:00:00"
        );
    }
}
