//! Timestamp parsing for event endpoints and query bounds.
//!
//! Every timestamp is read as a wall-clock date-time. A trailing `Z` or UTC
//! offset is accepted but not applied, so `2024-06-03T23:30:00+08:00` is
//! still an event on the 3rd. Date-only strings mean midnight of that day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::Endpoint;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse an ISO-like timestamp. Returns `None` for anything unrecognized.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Classify a normalized `start` / `end` field.
pub fn endpoint(field: &str) -> Endpoint {
    if field.is_empty() {
        return Endpoint::Missing;
    }
    match parse_timestamp(field) {
        Some(ts) => Endpoint::At(ts),
        None => Endpoint::Unparsed,
    }
}
