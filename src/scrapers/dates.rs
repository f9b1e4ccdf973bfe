//! Publisher-local publish-time parsing.
//!
//! Publishers print dates in a dozen shapes ("5th Oct, 2023", "Tuesday,
//! 03 October 2023 - 04:12 PM", "10/05/2023 - 14:20"). Each adapter lists the
//! `chrono` formats it expects; the text is normalized first (ordinal
//! suffixes dropped, whitespace collapsed) and interpreted in the
//! publisher's home zone.

use crate::window::{local_to_utc, start_of_day};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// How one publisher prints its publish times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishTime {
    /// Tried in order. A format without time fields means local midnight.
    pub formats: &'static [&'static str],
    /// Treat a missing date as "today" in the publisher zone.
    pub empty_means_today: bool,
}

impl PublishTime {
    pub const fn new(formats: &'static [&'static str]) -> Self {
        PublishTime {
            formats,
            empty_means_today: false,
        }
    }

    /// Parse `raw` as a wall-clock time in `tz`. `None` if nothing matches.
    pub fn parse(&self, raw: &str, tz: Tz, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let text = normalize(raw);
        if text.is_empty() {
            return self
                .empty_means_today
                .then(|| start_of_day(now.with_timezone(&tz).date_naive(), tz));
        }

        for fmt in self.formats {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&text, fmt) {
                return Some(local_to_utc(naive, tz));
            }
            if let Ok(day) = NaiveDate::parse_from_str(&text, fmt) {
                return Some(start_of_day(day, tz));
            }
        }
        None
    }
}

/// Drop ordinal suffixes, non-breaking spaces and repeated whitespace.
pub fn normalize(raw: &str) -> String {
    let text = raw.replace(['\u{a0}', '\r', '\n', '\t'], " ");
    let text = ORDINAL.replace_all(&text, "$1");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
