//! Canonical timestamp encoding.
//!
//! Revision cutoff lookups compare stored timestamps as strings, so the
//! encoding is fixed width, always UTC, with millisecond precision:
//! `YYYY-MM-DD HH:MM:SS.mmmZ`.

use chrono::{DateTime, NaiveDateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3fZ";

/// Formats an instant using the canonical storage encoding.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a canonical storage timestamp.
///
/// Returns `None` for any value not produced by [`format_timestamp`].
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
