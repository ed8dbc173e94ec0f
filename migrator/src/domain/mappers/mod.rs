//! # Field Mappers
//!
//! One mapper per entity kind turns a loosely-typed source record into the
//! matching destination row shape. All mappers share the same normalization
//! rules:
//!
//! - strings: source value if present and non-empty, else a kind default
//! - numbers: JSON number, or string parsed as a number, else a kind
//!   default (0 for money/rates, 1 for quantity, 0 for quantity sold)
//! - enums: verbatim pass-through when present, else the documented default
//! - dates: native timestamp map, RFC 3339 / `YYYY-MM-DD` string, or epoch
//!   milliseconds; unparseable required dates become "now", optional ones
//!   become null
//! - child foreign keys: verbatim pass-through, else null
//!
//! A record that is not a JSON object fails to map; the caller catches the
//! error and skips only that record.

mod bet;
mod debt;
mod dream;
mod expense;
mod goal;
mod product;
mod revenue;
mod transaction;

pub use bet::map_bet;
pub use debt::map_debt;
pub use dream::map_dream;
pub use expense::map_expense;
pub use goal::map_goal;
pub use product::map_product;
pub use revenue::map_revenue;
pub use transaction::map_transaction;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Map, Value};

/// View a raw record as an object, the only shape a record may have.
pub(crate) fn as_record(raw: &Value) -> Result<&Map<String, Value>> {
    raw.as_object()
        .ok_or_else(|| anyhow!("record is not an object"))
}

/// Identifying field of a record for log and report lines.
pub fn record_label(raw: &Value) -> String {
    raw.as_object()
        .and_then(|record| {
            record
                .get("name")
                .or_else(|| record.get("description"))
                .or_else(|| record.get("title"))
        })
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| "(unnamed)".to_string())
}

/// Non-empty string field, or the default.
pub(crate) fn text_or(record: &Map<String, Value>, key: &str, default: &str) -> String {
    match record.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// Verbatim string field, or `None` when absent or empty.
pub(crate) fn opt_text(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Numeric field parsed as floating point. Strings are parsed; anything
/// unparseable falls back to the default.
pub(crate) fn float_or(record: &Map<String, Value>, key: &str, default: f64) -> f64 {
    match record.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(default),
        _ => default,
    }
}

/// Quantity-like field parsed as an integer; fractional values truncate.
pub(crate) fn int_or(record: &Map<String, Value>, key: &str, default: i64) -> i64 {
    match record.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(default)
        }
        _ => default,
    }
}

pub(crate) fn bool_or(record: &Map<String, Value>, key: &str, default: bool) -> bool {
    record.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// String-array field; non-string elements are dropped.
pub(crate) fn string_list(record: &Map<String, Value>, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Normalize any of the date representations found in source documents.
///
/// Native timestamps decode to a map with `seconds`/`nanoseconds` (older
/// exports prefix them with an underscore); strings are RFC 3339 or plain
/// `YYYY-MM-DD`; numbers are epoch milliseconds.
pub(crate) fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_datetime_str(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, nanos as u32).single()
        }
        _ => None,
    }
}

fn parse_datetime_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Required date field: parse failures and missing values become "now".
pub(crate) fn date_or_now(record: &Map<String, Value>, key: &str) -> DateTime<Utc> {
    record
        .get(key)
        .and_then(parse_datetime)
        .unwrap_or_else(Utc::now)
}

/// Optional date field: parse failures and missing values become `None`.
pub(crate) fn opt_date(record: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    record.get(key).and_then(parse_datetime)
}
