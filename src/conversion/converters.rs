//! Inbound converters: parse the stored form of a declared column back into a typed value.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::SqlValue;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn as_str(raw: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(raw).map_err(|e| format!("stored value is not UTF-8: {e}"))
}

/// `YYYY-MM-DD` into [`SqlValue::Date`].
///
/// # Errors
/// Returns a message if the text is not an ISO 8601 calendar date.
pub fn iso_date(raw: &[u8]) -> Result<SqlValue, String> {
    let text = as_str(raw)?;
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map(SqlValue::Date)
        .map_err(|e| format!("invalid ISO date {text:?}: {e}"))
}

/// ISO 8601 date-time into [`SqlValue::DateTime`].
///
/// Accepts either `T` or a space between date and time, optional seconds and
/// fraction, and a bare date (read as midnight).
///
/// # Errors
/// Returns a message if none of the accepted shapes match.
pub fn iso_datetime(raw: &[u8]) -> Result<SqlValue, String> {
    let text = as_str(raw)?.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(SqlValue::DateTime(dt));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(SqlValue::DateTime)
        .ok_or_else(|| format!("invalid ISO date-time {text:?}"))
}

/// Integer Unix epoch seconds into a UTC [`SqlValue::DateTime`].
///
/// Not registered by default; register it under `timestamp` to read columns
/// written with [`datetime_to_epoch`](super::adapters::datetime_to_epoch).
///
/// # Errors
/// Returns a message if the stored value is not an integer in range.
pub fn epoch_timestamp(raw: &[u8]) -> Result<SqlValue, String> {
    let text = as_str(raw)?.trim();
    let secs: i64 = text
        .parse()
        .map_err(|e| format!("invalid epoch seconds {text:?}: {e}"))?;
    DateTime::from_timestamp(secs, 0)
        .map(|dt| SqlValue::DateTime(dt.naive_utc()))
        .ok_or_else(|| format!("epoch seconds out of range: {secs}"))
}
