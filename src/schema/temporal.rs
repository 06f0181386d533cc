//! Temporal properties: `Date` and `DateTime`
//!
//! Accepted raw representations:
//! - epoch timestamps in seconds (int or float), read as UTC
//! - strings: `YYYY-MM-DDTHH:MM:SS[.ffffff]` with optional `Z` or `±HH:MM`
//!   suffix for datetimes, `YYYY-MM-DD` (time part ignored) for dates
//! - already coerced date/datetime values
//!
//! Booleans and every other kind are type mismatches. Parse failures of any
//! sort surface as `ParseFailure`, never as a raw parser error.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use super::errors::{SchemaError, SchemaResult};
use super::scalar::{Scalar, ScalarKind};
use super::value::{Value, ValueKind};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Copy)]
pub struct DateKind;

impl ScalarKind for DateKind {
    type Measure = NaiveDate;
    const ACCEPTS: &'static [ValueKind] = &[ValueKind::Date];

    fn measure(value: &Value) -> Option<NaiveDate> {
        match value {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    fn coerce(value: Value) -> SchemaResult<Value> {
        match value {
            Value::Date(_) => Ok(value),
            Value::DateTime(dt) => Ok(Value::Date(dt.date_naive())),
            Value::String(text) => parse_date(&text).map(Value::Date),
            Value::Int(_) | Value::Float(_) => {
                from_timestamp(&value).map(|dt| Value::Date(dt.date_naive()))
            }
            other => Err(SchemaError::type_mismatch("date", other.kind())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DateTimeKind;

impl ScalarKind for DateTimeKind {
    type Measure = chrono::DateTime<FixedOffset>;
    const ACCEPTS: &'static [ValueKind] = &[ValueKind::DateTime];

    fn measure(value: &Value) -> Option<chrono::DateTime<FixedOffset>> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    fn coerce(value: Value) -> SchemaResult<Value> {
        match value {
            Value::DateTime(_) => Ok(value),
            Value::String(text) => parse_datetime(&text).map(Value::DateTime),
            Value::Int(_) | Value::Float(_) => from_timestamp(&value).map(Value::DateTime),
            other => Err(SchemaError::type_mismatch("datetime", other.kind())),
        }
    }
}

pub type Date = Scalar<DateKind>;
pub type DateTime = Scalar<DateTimeKind>;

/// Converts epoch seconds into a UTC instant, microsecond precision
fn from_timestamp(value: &Value) -> SchemaResult<chrono::DateTime<FixedOffset>> {
    let micros = match value {
        Value::Int(secs) => secs.checked_mul(1_000_000),
        Value::Float(secs) if secs.is_finite() => {
            let micros = (secs * 1_000_000.0).round();
            (micros.abs() < i64::MAX as f64).then_some(micros as i64)
        }
        _ => None,
    };

    micros
        .and_then(chrono::DateTime::<Utc>::from_timestamp_micros)
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| SchemaError::parse_failure(&value.to_string(), "timestamp out of range"))
}

/// Parses a date, ignoring any time-of-day part after `T`
pub fn parse_date(text: &str) -> SchemaResult<NaiveDate> {
    let date = text.split('T').next().unwrap_or(text);
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| SchemaError::parse_failure(text, e))
}

/// Parses a datetime with optional `Z` or `±HH:MM` suffix (UTC when absent)
pub fn parse_datetime(text: &str) -> SchemaResult<chrono::DateTime<FixedOffset>> {
    let normalized = match text.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => text.to_string(),
    };

    let (literal, offset) = match split_offset(&normalized) {
        Some((literal, sign, hours, minutes)) => {
            let (hours, minutes) = if sign == '-' {
                (-hours, -minutes)
            } else {
                (hours, minutes)
            };
            let seconds = hours * 3600 + minutes * 60;
            let offset = FixedOffset::east_opt(seconds).ok_or_else(|| {
                SchemaError::parse_failure(text, "timezone offset out of range")
            })?;
            (literal, offset)
        }
        None => (normalized.as_str(), utc()),
    };

    let naive = NaiveDateTime::parse_from_str(literal, DATETIME_FORMAT)
        .map_err(|e| SchemaError::parse_failure(text, e))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| SchemaError::parse_failure(text, "ambiguous local time"))
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Splits a trailing `±HH:MM` into (rest, sign, hours, minutes)
fn split_offset(text: &str) -> Option<(&str, char, i32, i32)> {
    if text.len() < 6 || !text.is_char_boundary(text.len() - 6) {
        return None;
    }
    let (rest, suffix) = text.split_at(text.len() - 6);
    let bytes = suffix.as_bytes();

    let sign = match bytes[0] {
        b'+' => '+',
        b'-' => '-',
        _ => return None,
    };
    let digits = [bytes[1], bytes[2], bytes[4], bytes[5]];
    if bytes[3] != b':' || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let hours = i32::from(bytes[1] - b'0') * 10 + i32::from(bytes[2] - b'0');
    let minutes = i32::from(bytes[4] - b'0') * 10 + i32::from(bytes[5] - b'0');
    Some((rest, sign, hours, minutes))
}
