//! Timestamp labels for message cards and the status line.
//!
//! Message times are shown at a single fixed offset (UTC+2), applied to both
//! the message instant and "now" before comparing calendar days. The viewer's
//! own timezone plays no part in the day comparison.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

/// Fixed display offset east of UTC, in seconds.
pub const DISPLAY_OFFSET_SECS: i64 = 2 * 60 * 60;

const TODAY_PREFIX: &str = "Сьогодні";
const YESTERDAY_PREFIX: &str = "Вчора";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Relative label for a message timestamp.
///
/// Absent, empty or unparseable input gives an empty string. If the parsed
/// instant cannot be shifted to the display offset, the raw input is
/// returned unchanged.
pub fn format_timestamp(ts: Option<&str>, now: DateTime<Utc>) -> String {
    let raw = match ts {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return String::new(),
    };

    let Some(instant) = parse_timestamp(raw) else {
        return String::new();
    };

    match relative_label(instant, now) {
        Some(label) => label,
        None => {
            tracing::debug!(timestamp = raw, "timestamp out of display range");
            raw.to_string()
        }
    }
}

/// [`format_timestamp`] against the current clock.
pub fn format_timestamp_now(ts: Option<&str>) -> String {
    format_timestamp(ts, Utc::now())
}

/// `HH:MM:SS` for the "last refreshed" status line.
pub fn format_clock<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format("%H:%M:%S").to_string()
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn relative_label(instant: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
    let shown = to_display_time(instant.naive_utc())?;
    let today = to_display_time(now.naive_utc())?.date();

    let time = shown.format("%H:%M");
    let label = if shown.date() == today {
        format!("{}, {}", TODAY_PREFIX, time)
    } else if today.pred_opt() == Some(shown.date()) {
        format!("{}, {}", YESTERDAY_PREFIX, time)
    } else {
        format!("{}, {}", shown.format("%d.%m.%Y"), time)
    };

    Some(label)
}

fn to_display_time(utc: NaiveDateTime) -> Option<NaiveDateTime> {
    utc.checked_add_signed(Duration::seconds(DISPLAY_OFFSET_SECS))
}
