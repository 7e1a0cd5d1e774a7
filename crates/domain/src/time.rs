//! Time and timestamp helpers.

use chrono::{DateTime, FixedOffset, Utc};

/// UTC timestamp used for `last_changed`, `end_time`, history records, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse a host timestamp (RFC 3339, any offset) into UTC.
///
/// Returns `None` for empty, `unknown`, `unavailable` or malformed values.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    DateTime::<FixedOffset>::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
