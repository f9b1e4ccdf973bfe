//! Time windows deciding which publish instants qualify for ingestion.
//!
//! A window is a closed instant range `[start, end]`: a publish time equal to
//! either bound is accepted. When a caller leaves a bound open, it defaults to
//! the publisher-local calendar day that contains "now".

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Caller-supplied bounds, either of which may be left open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowTimes {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl WindowTimes {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        WindowTimes {
            start: Some(start),
            end: Some(end),
        }
    }

    /// From the start of `at`'s calendar day in `tz` up to `at` itself.
    ///
    /// This is the window scheduled scrape jobs use.
    pub fn day_until(at: DateTime<Utc>, tz: Tz) -> Self {
        let local_day = at.with_timezone(&tz).date_naive();
        WindowTimes {
            start: Some(start_of_day(local_day, tz)),
            end: Some(at),
        }
    }
}

/// A resolved, closed instant range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// The whole calendar day containing `now`, as seen in `tz`.
    pub fn local_day(now: DateTime<Utc>, tz: Tz) -> Self {
        let day = now.with_timezone(&tz).date_naive();
        TimeWindow {
            start: start_of_day(day, tz),
            end: end_of_day(day, tz),
        }
    }

    /// Fill open bounds of `times` from the local day containing `now`.
    pub fn resolve(times: WindowTimes, tz: Tz, now: DateTime<Utc>) -> Self {
        let day = TimeWindow::local_day(now, tz);
        TimeWindow {
            start: times.start.unwrap_or(day.start),
            end: times.end.unwrap_or(day.end),
        }
    }

    /// Inclusive of both bounds.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// First instant of `day` in `tz`, as UTC.
///
/// Falls back to the earliest valid local time when midnight does not exist
/// (a DST gap); none of the covered zones observe DST.
pub fn start_of_day(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    local_to_utc(day.and_time(NaiveTime::MIN), tz)
}

/// Last microsecond of `day` in `tz`, as UTC.
pub fn end_of_day(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
    start_of_day(next, tz) - TimeDelta::microseconds(1)
}

/// Interpret a wall-clock time in `tz`, picking the earlier instant on
/// ambiguity and shifting forward an hour on a gap.
pub fn local_to_utc(naive: chrono::NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}
