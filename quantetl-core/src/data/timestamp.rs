//! Timestamp parsing and formatting for text sources and sinks.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// CSV output format: second precision, `T` separator.
pub const CSV_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// JSON output format: millisecond precision ISO 8601.
pub const JSON_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Parse a timestamp in any of the accepted textual forms.
///
/// Accepts bare dates (midnight), naive date-times with `T` or space
/// separators, and RFC 3339 with an offset (converted to UTC).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(ts);
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.naive_utc())
}

/// Convert epoch milliseconds to a naive UTC timestamp.
pub fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|ts| ts.naive_utc())
}

/// Epoch milliseconds of a naive UTC timestamp.
pub fn to_epoch_millis(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}
