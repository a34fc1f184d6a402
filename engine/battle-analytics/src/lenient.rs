//! Lenient field decoding for battle records.
//!
//! The game's web API is loose about types: counters arrive as numbers or as
//! numeric strings, and fields are frequently missing or `null`. Every decoder
//! here distinguishes "absent" (`None`) from "present but garbage" (coerced),
//! because several validity filters test presence only.

use crate::battle::{CollectionItem, GameResult};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Integer-prefix coercion of an arbitrary JSON value; garbage becomes 0.
pub(crate) fn coerce_int(value: &Value) -> i64 {
    int_value(value).unwrap_or(0)
}

fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Parse an optional sign followed by leading digits, ignoring any trailing text.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

pub(crate) fn int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = present(Option::<Value>::deserialize(deserializer)?);
    Ok(value.map(|v| coerce_int(&v)))
}

/// Identifier decoding: unlike counters, an unparseable id is treated as absent.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = present(Option::<Value>::deserialize(deserializer)?);
    Ok(value.and_then(|v| int_value(&v)))
}

pub(crate) fn int_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(int(deserializer)?.unwrap_or(0))
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = present(Option::<Value>::deserialize(deserializer)?);
    Ok(value.map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    }))
}

pub(crate) fn game_result<'de, D>(deserializer: D) -> Result<Option<GameResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = present(Option::<Value>::deserialize(deserializer)?);
    Ok(value.map(|v| match int_value(&v) {
        Some(0) => GameResult::Success,
        _ => GameResult::Failure,
    }))
}

pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = present(Option::<Value>::deserialize(deserializer)?);
    Ok(value.and_then(|v| match v {
        Value::String(s) => parse_timestamp(&s),
        _ => None,
    }))
}

/// Parse the timestamp shapes the API and our own serialized output use.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

pub(crate) fn collections<'de, D>(deserializer: D) -> Result<Vec<CollectionItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
