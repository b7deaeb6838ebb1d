//! Timestamp utilities

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time as stored in the database
///
/// RFC 3339 with millisecond precision, so two writes a few milliseconds
/// apart produce distinct, lexicographically ordered values.
pub fn db_timestamp() -> String {
    format_db(now())
}

/// Timestamp for a row being rewritten
///
/// Strictly later than `previous`: the current time, or `previous` plus
/// one millisecond when the clock has not moved past it. An unparseable
/// `previous` falls back to the current time.
pub fn next_timestamp(previous: &str) -> String {
    let current = now();
    match DateTime::parse_from_rfc3339(previous) {
        Ok(previous) => {
            let floor = previous.with_timezone(&Utc) + Duration::milliseconds(1);
            format_db(current.max(floor))
        }
        Err(_) => format_db(current),
    }
}

fn format_db(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
