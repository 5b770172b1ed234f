//! Parsing for the timestamp strings the backend emits.
//!
//! Upload and compression times arrive as `%Y-%m-%d %H:%M:%S%z`. The offset
//! is empty when the server formatted a naive local time, so both shapes are
//! accepted, as is RFC 3339.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::error::{ModelError, Result};

const SERVER_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";
const SERVER_FORMAT_NAIVE: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a server timestamp into UTC. Naive values are taken as UTC.
pub fn parse_server_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(raw, SERVER_FORMAT)
    {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, SERVER_FORMAT_NAIVE)
        .map(|naive| naive.and_utc())
        .map_err(|_| ModelError::InvalidTimestamp(raw.to_string()))
}

/// Render a server timestamp for display, falling back to the raw text.
pub fn display_server_timestamp(raw: &str) -> String {
    match parse_server_timestamp(raw) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}
