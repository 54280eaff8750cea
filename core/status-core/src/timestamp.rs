//! Timestamp parsing for reported job times.
//!
//! Controllers are not consistent about ISO 8601, so besides RFC 3339 we
//! accept basic and hour-only offsets, offset-less date-times (read as UTC),
//! hour-only times and reduced-precision dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

// `%#z` takes `Z`, `+08`, `+0800` and `+08:00`.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let value = value.trim();

    let first_err = match parse_datetime(value) {
        Ok(dt) => return Ok(dt),
        Err(err) => err,
    };

    if let Some(expanded) = expand_hour_only(value) {
        if let Ok(dt) = parse_datetime(&expanded) {
            return Ok(dt);
        }
    }

    match parse_reduced_date(value) {
        Some(dt) => Ok(dt),
        None => Err(first_err),
    }
}

/// Storage form for job timestamps.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let rfc3339_err = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(err) => err,
    };

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(rfc3339_err)
}

/// `2024-01-01T10` and `2024-01-01T10+08` become `T10:00...`; chrono
/// requires minutes.
fn expand_hour_only(value: &str) -> Option<String> {
    let (date, rest) = value.split_once('T')?;
    let hour = rest.get(..2)?;
    if !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let tail = &rest[2..];
    if !(tail.is_empty() || tail.starts_with(['+', '-', 'Z'])) {
        return None;
    }
    Some(format!("{date}T{hour}:00{tail}"))
}

/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY` at midnight UTC.
fn parse_reduced_date(value: &str) -> Option<DateTime<Utc>> {
    let candidates = [
        value.to_string(),
        format!("{value}-01"),
        format!("{value}-01-01"),
    ];
    candidates.iter().find_map(|candidate| {
        NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    })
}
