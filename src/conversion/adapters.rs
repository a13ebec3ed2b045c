//! Outbound adapters: turn a typed value into something SQLite can store.

use chrono::Timelike;
use rusqlite::types::Value;

use crate::types::SqlValue;

/// Date as `YYYY-MM-DD`.
///
/// # Errors
/// Returns a message when handed anything other than [`SqlValue::Date`].
pub fn date_iso(value: &SqlValue) -> Result<Value, String> {
    match value {
        SqlValue::Date(date) => Ok(Value::Text(date.format("%Y-%m-%d").to_string())),
        other => Err(format!("date adapter cannot handle {:?}", other.kind())),
    }
}

/// Timezone-naive ISO 8601 date-time, `YYYY-MM-DDTHH:MM:SS` with a six digit
/// fraction only when the sub-second part is non-zero.
///
/// # Errors
/// Returns a message when handed anything other than [`SqlValue::DateTime`].
pub fn datetime_iso(value: &SqlValue) -> Result<Value, String> {
    match value {
        SqlValue::DateTime(dt) => {
            let fmt = if dt.nanosecond() == 0 {
                "%Y-%m-%dT%H:%M:%S"
            } else {
                "%Y-%m-%dT%H:%M:%S%.6f"
            };
            Ok(Value::Text(dt.format(fmt).to_string()))
        }
        other => Err(format!("datetime adapter cannot handle {:?}", other.kind())),
    }
}

/// Unix epoch seconds, treating the naive value as UTC. Sub-second precision is dropped.
///
/// Not registered by default; pair it with
/// [`epoch_timestamp`](super::converters::epoch_timestamp).
///
/// # Errors
/// Returns a message when handed anything other than [`SqlValue::DateTime`].
pub fn datetime_to_epoch(value: &SqlValue) -> Result<Value, String> {
    match value {
        SqlValue::DateTime(dt) => Ok(Value::Integer(dt.and_utc().timestamp())),
        other => Err(format!("epoch adapter cannot handle {:?}", other.kind())),
    }
}
