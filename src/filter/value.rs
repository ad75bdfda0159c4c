//! Scalar coercion shared by the compiler and the in-memory backend
//!
//! Both sides must read a JSON scalar the same way, otherwise a predicate
//! could match differently at compile time and at evaluation time.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Text form of a scalar: strings as-is, numbers and booleans rendered.
/// NULL and structured values have no text form.
pub(crate) fn text_of(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numeric form of a stored scalar. A string counts only when its whole
/// content is a JSON number, surrounding whitespace allowed. The SQLite
/// backend applies the same rule through `json_valid`/`json_type`.
pub(crate) fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()),
            _ => None,
        },
        _ => None,
    }
}

/// Calendar day of a stored scalar: the leading `YYYY-MM-DD` of a string,
/// whatever follows it. A timestamp keeps the day it was written in, offset
/// or not. The SQLite backend reads `substr(col, 1, 10)` the same way.
pub(crate) fn stored_date_of(value: &Value) -> Option<NaiveDate> {
    let Value::String(s) = value else {
        return None;
    };
    let head = s.as_bytes().get(..10)?;
    let shaped = head.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shaped {
        return None;
    }
    let digits = |range: std::ops::Range<usize>| {
        head[range]
            .iter()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
    };
    NaiveDate::from_ymd_opt(digits(0..4) as i32, digits(5..7), digits(8..10))
}

/// Calendar date of a client-supplied scalar, ignoring any time of day
pub(crate) fn date_of(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.fff]` or RFC 3339 into a date
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| datetime.date())
}

/// Best-effort boolean reading: JSON booleans, 1/0, and the usual
/// true/false, yes/no, on/off spellings (case-insensitive).
pub(crate) fn bool_of(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// List form for set membership: a JSON array of scalars, or a
/// comma-separated string. Items are trimmed and empty items dropped.
pub(crate) fn list_of(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| text_of(item).map(Cow::into_owned))
            .collect(),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::Number(_) | Value::Bool(_) => text_of(value).map(|t| vec![t.into_owned()]),
        _ => None,
    }
}

/// Text serialization of a stored value, as a relational store would hold a
/// JSON/array column
pub(crate) fn serialized(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
