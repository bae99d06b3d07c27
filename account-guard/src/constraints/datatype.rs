//! Type classification: does a raw value conform to a [`FieldType`]?
//!
//! Conformance is a plain boolean. It is the field validator that turns a
//! failed check into a type-mismatch error.

use super::patterns::{EMAIL, IPV4, IPV6, PHONE, UUID};
use crate::core::{FieldType, Value};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

/// Calendar and ISO week-date layouts, extended before basic.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%G-W%V-%u", "%GW%V%u"];

/// Clock layouts after the hour-only form. Seconds and fractions are optional.
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%H%M%S%.f", "%H%M"];

/// Returns true if `value` has the shape `kind` requires.
///
/// Null always conforms; whether a field may be absent is decided by the
/// constraint's `required` flag, not by its type.
///
/// # Examples
///
/// ```rust
/// use account_guard::constraints::conforms;
/// use account_guard::core::{FieldType, Value};
///
/// assert!(conforms(&Value::from("550E8400-E29B-41D4-A716-446655440000"), FieldType::Identifier));
/// assert!(conforms(&Value::Integer(3), FieldType::Real));
/// assert!(!conforms(&Value::Real(3.5), FieldType::Integer));
/// assert!(!conforms(&Value::from("::1"), FieldType::IpAddress));
/// assert!(conforms(&Value::Null, FieldType::Email));
/// ```
pub fn conforms(value: &Value, kind: FieldType) -> bool {
    if value.is_null() {
        return true;
    }

    match kind {
        FieldType::Text => matches!(value, Value::Text(_)),
        FieldType::Integer => matches!(value, Value::Integer(_)),
        FieldType::Real => matches!(value, Value::Integer(_) | Value::Real(_)),
        FieldType::Boolean => matches!(value, Value::Boolean(_)),
        FieldType::Email => matches!(value, Value::Text(s) if EMAIL.is_match(s)),
        FieldType::Phone => matches!(value, Value::Text(s) if PHONE.is_match(s)),
        FieldType::Identifier => {
            matches!(value, Value::Text(s) if UUID.is_match(&s.to_lowercase()))
        }
        FieldType::Timestamp => match value {
            Value::Timestamp(_) => true,
            Value::Text(s) => parse_timestamp(s).is_some(),
            _ => false,
        },
        FieldType::IpAddress => {
            matches!(value, Value::Text(s) if IPV4.is_match(s) || IPV6.is_match(s))
        }
    }
}

/// Parses an ISO-8601 timestamp.
///
/// The date is calendar (`2025-08-17`, `20250817`) or ISO week
/// (`2025-W33-7`, `2025W337`). An optional time follows a `T` or a space, in
/// extended or basic form, down to hour-only (`T10`). The offset is `Z`,
/// `+HH`, `+HHMM` or `+HH:MM`. Timestamps without an offset, and bare dates,
/// are taken to be UTC. Leap seconds are rejected.
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let (date_part, time_part) = match text.find(['T', 't', ' ']) {
        Some(at) => (&text[..at], Some(&text[at + 1..])),
        None => (text, None),
    };

    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())?;

    let (time, offset) = match time_part {
        Some(rest) => {
            let (clock, zone) = split_zone(rest);
            (parse_clock(clock)?, parse_offset(zone)?)
        }
        None => (NaiveTime::from_hms_opt(0, 0, 0)?, FixedOffset::east_opt(0)?),
    };

    offset.from_local_datetime(&date.and_time(time)).single()
}

/// Splits `10:30:00+02:00` into the clock and its offset. `Z` becomes `+00`.
fn split_zone(rest: &str) -> (&str, &str) {
    if let Some(clock) = rest.strip_suffix('Z').or_else(|| rest.strip_suffix('z')) {
        return (clock, "+00");
    }
    match rest.find(['+', '-']) {
        Some(at) => rest.split_at(at),
        None => (rest, ""),
    }
}

fn parse_clock(clock: &str) -> Option<NaiveTime> {
    let time = if clock.len() == 2 {
        let hour = clock.parse::<u32>().ok()?;
        NaiveTime::from_hms_opt(hour, 0, 0)?
    } else {
        TIME_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(clock, format).ok())?
    };

    // chrono stores a leap second as a nanosecond count past one second
    (time.nanosecond() < 1_000_000_000).then_some(time)
}

/// An empty zone is UTC.
fn parse_offset(zone: &str) -> Option<FixedOffset> {
    let (sign, digits) = match zone.as_bytes().first() {
        None => return FixedOffset::east_opt(0),
        Some(b'+') => (1, &zone[1..]),
        Some(b'-') => (-1, &zone[1..]),
        Some(_) => return None,
    };

    let digits = digits.replacen(':', "", 1);
    if !matches!(digits.len(), 2 | 4) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = if digits.len() == 4 {
        digits[2..].parse().ok()?
    } else {
        0
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Resolves a timestamp-like value to UTC, for rules that compare against
/// the evaluation clock.
pub fn timestamp_of(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(ts) => Some(ts.with_timezone(&Utc)),
        Value::Text(s) => parse_timestamp(s).map(|ts| ts.with_timezone(&Utc)),
        _ => None,
    }
}
