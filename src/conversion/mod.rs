//! Value conversion between [`SqlValue`] and SQLite storage.
//!
//! Adapters run on the way in (parameter binding) and are keyed by
//! [`ValueKind`]. Converters run on the way out and are keyed by the first word
//! of a column's declared type, case-insensitively. Both tables live in a
//! [`TypeRegistry`] handed to [`Connection::open`](crate::Connection::open);
//! registering a second entry under the same key replaces the first.

use std::collections::HashMap;

use rusqlite::types::Value;

use crate::error::{CompatDbError, Result};
use crate::types::{SqlValue, ValueKind};

pub mod adapters;
pub mod converters;

/// Outbound adapter.
pub type Adapter = fn(&SqlValue) -> Result<Value, String>;

/// Inbound converter, handed the stored value's bytes.
pub type Converter = fn(&[u8]) -> Result<SqlValue, String>;

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    adapters: HashMap<ValueKind, Adapter>,
    converters: HashMap<String, Converter>,
}

impl Default for TypeRegistry {
    /// ISO 8601 adapters for dates and date-times, and converters for the
    /// `date`, `datetime` and `timestamp` declared types.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_adapter(ValueKind::Date, adapters::date_iso);
        registry.register_adapter(ValueKind::DateTime, adapters::datetime_iso);
        registry.register_converter("date", converters::iso_date);
        registry.register_converter("datetime", converters::iso_datetime);
        registry.register_converter("timestamp", converters::iso_datetime);
        registry
    }
}

impl TypeRegistry {
    /// A registry with nothing registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
            converters: HashMap::new(),
        }
    }

    /// Register an adapter, returning the one it replaced.
    pub fn register_adapter(&mut self, kind: ValueKind, adapter: Adapter) -> Option<Adapter> {
        self.adapters.insert(kind, adapter)
    }

    /// Register a converter for a declared type name, returning the one it replaced.
    pub fn register_converter(&mut self, name: &str, converter: Converter) -> Option<Converter> {
        self.converters.insert(name.to_ascii_lowercase(), converter)
    }

    #[must_use]
    pub fn with_adapter(mut self, kind: ValueKind, adapter: Adapter) -> Self {
        self.register_adapter(kind, adapter);
        self
    }

    #[must_use]
    pub fn with_converter(mut self, name: &str, converter: Converter) -> Self {
        self.register_converter(name, converter);
        self
    }

    #[must_use]
    pub fn adapter(&self, kind: ValueKind) -> Option<Adapter> {
        self.adapters.get(&kind).copied()
    }

    /// Converter selected by a declared column type such as `TIMESTAMP` or `date NOT NULL`.
    #[must_use]
    pub fn converter_for(&self, decl_type: &str) -> Option<Converter> {
        let name = decl_type
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or_default();
        if name.is_empty() {
            return None;
        }
        self.converters.get(&name.to_ascii_lowercase()).copied()
    }

    /// Convert a parameter into its storage form.
    ///
    /// # Errors
    /// Returns `CompatDbError::ParameterError` if the adapter fails or a date
    /// kind has no adapter registered.
    pub fn to_sqlite(&self, value: &SqlValue) -> Result<Value> {
        if let Some(adapter) = self.adapter(value.kind()) {
            return adapter(value).map_err(CompatDbError::ParameterError);
        }
        match value {
            SqlValue::Null => Ok(Value::Null),
            SqlValue::Integer(i) => Ok(Value::Integer(*i)),
            SqlValue::Real(f) => Ok(Value::Real(*f)),
            SqlValue::Text(s) => Ok(Value::Text(s.clone())),
            SqlValue::Blob(b) => Ok(Value::Blob(b.clone())),
            SqlValue::Bool(b) => Ok(Value::Integer(i64::from(*b))),
            SqlValue::Date(_) | SqlValue::DateTime(_) => Err(CompatDbError::ParameterError(
                format!("no adapter registered for {:?}", value.kind()),
            )),
        }
    }

    /// Convert a stored value read from `column`.
    ///
    /// NULL and columns without a matching declared type come back as-is.
    ///
    /// # Errors
    /// Returns `CompatDbError::ConversionError` if the converter rejects the value.
    pub fn from_sqlite(
        &self,
        value: Value,
        column: &str,
        decl_type: Option<&str>,
    ) -> Result<SqlValue> {
        let converter = match (decl_type, &value) {
            (_, Value::Null) | (None, _) => None,
            (Some(decl), _) => self.converter_for(decl),
        };
        let Some(converter) = converter else {
            return Ok(SqlValue::from(value));
        };
        let raw = match value {
            Value::Text(s) => s.into_bytes(),
            Value::Blob(b) => b,
            Value::Integer(i) => i.to_string().into_bytes(),
            Value::Real(f) => f.to_string().into_bytes(),
            Value::Null => return Ok(SqlValue::Null),
        };
        converter(&raw).map_err(|message| CompatDbError::ConversionError {
            column: column.to_string(),
            decl_type: decl_type.unwrap_or_default().to_string(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    #[test]
    fn default_adapters_write_iso_text() {
        let reg = TypeRegistry::default();
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            reg.to_sqlite(&SqlValue::Date(date)).unwrap(),
            Value::Text("2024-02-29".into())
        );
        assert_eq!(
            reg.to_sqlite(&SqlValue::DateTime(dt("2024-02-29 13:45:00"))).unwrap(),
            Value::Text("2024-02-29T13:45:00".into())
        );
        assert_eq!(
            reg.to_sqlite(&SqlValue::DateTime(dt("2024-02-29 13:45:00.5"))).unwrap(),
            Value::Text("2024-02-29T13:45:00.500000".into())
        );
        assert_eq!(reg.to_sqlite(&SqlValue::Bool(true)).unwrap(), Value::Integer(1));
    }

    #[test]
    fn converters_follow_first_word_of_decltype() {
        let reg = TypeRegistry::default();
        assert!(reg.converter_for("DATE").is_some());
        assert!(reg.converter_for("timestamp NOT NULL").is_some());
        assert!(reg.converter_for("datetime(6)").is_some());
        assert!(reg.converter_for("INTEGER").is_none());
        assert!(reg.converter_for("").is_none());
    }

    #[test]
    fn inbound_conversion_parses_both_separators() {
        let reg = TypeRegistry::default();
        let expected = SqlValue::DateTime(dt("2021-06-01 08:30:15.25"));
        for text in ["2021-06-01T08:30:15.25", "2021-06-01 08:30:15.250000"] {
            let got = reg
                .from_sqlite(Value::Text(text.into()), "at", Some("datetime"))
                .unwrap();
            assert_eq!(got, expected);
        }
        let null = reg.from_sqlite(Value::Null, "at", Some("date")).unwrap();
        assert_eq!(null, SqlValue::Null);
    }

    #[test]
    fn bad_stored_value_reports_column() {
        let reg = TypeRegistry::default();
        let err = reg
            .from_sqlite(Value::Text("yesterday".into()), "born", Some("DATE"))
            .unwrap_err();
        match err {
            CompatDbError::ConversionError {
                column, decl_type, ..
            } => {
                assert_eq!(column, "born");
                assert_eq!(decl_type, "DATE");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn last_registration_wins() {
        let mut reg = TypeRegistry::default();
        let previous = reg.register_adapter(ValueKind::DateTime, adapters::datetime_to_epoch);
        assert!(previous.is_some());
        reg.register_converter("TIMESTAMP", converters::epoch_timestamp);

        let moment = dt("1970-01-02 00:00:00");
        assert_eq!(
            reg.to_sqlite(&SqlValue::DateTime(moment)).unwrap(),
            Value::Integer(86_400)
        );
        let back = reg
            .from_sqlite(Value::Integer(86_400), "ts", Some("timestamp"))
            .unwrap();
        assert_eq!(back, SqlValue::DateTime(moment));
    }

    #[test]
    fn empty_registry_rejects_dates() {
        let reg = TypeRegistry::empty();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            reg.to_sqlite(&SqlValue::Date(date)),
            Err(CompatDbError::ParameterError(_))
        ));
    }
}
