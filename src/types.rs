use std::collections::{BTreeMap, HashMap};
use std::ops::Index;

use chrono::{NaiveDate, NaiveDateTime};

/// Values that can be bound as statement parameters or read back from a row.
///
/// ```rust
/// use pyformat_sqlite::prelude::*;
///
/// let params = vec![
///     SqlValue::Integer(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value
    Null,
    /// Integer value (64-bit)
    Integer(i64),
    /// Floating point value (64-bit)
    Real(f64),
    /// Text/string value
    Text(String),
    /// Binary data
    Blob(Vec<u8>),
    /// Boolean value, stored as 0/1
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time without a timezone
    DateTime(NaiveDateTime),
}

/// Logical kind of a [`SqlValue`], used to key outbound adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Null,
    Integer,
    Real,
    Text,
    Blob,
    Bool,
    Date,
    DateTime,
}

impl SqlValue {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            SqlValue::Null => ValueKind::Null,
            SqlValue::Integer(_) => ValueKind::Integer,
            SqlValue::Real(_) => ValueKind::Real,
            SqlValue::Text(_) => ValueKind::Text,
            SqlValue::Blob(_) => ValueKind::Blob,
            SqlValue::Bool(_) => ValueKind::Bool,
            SqlValue::Date(_) => ValueKind::Date,
            SqlValue::DateTime(_) => ValueKind::DateTime,
        }
    }

    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(value) => Some(*value),
            SqlValue::Bool(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Real(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        if let SqlValue::Date(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        if let SqlValue::DateTime(value) = self {
            Some(*value)
        } else {
            None
        }
    }
}

impl From<rusqlite::types::Value> for SqlValue {
    fn from(value: rusqlite::types::Value) -> Self {
        match value {
            rusqlite::types::Value::Null => SqlValue::Null,
            rusqlite::types::Value::Integer(i) => SqlValue::Integer(i),
            rusqlite::types::Value::Real(f) => SqlValue::Real(f),
            rusqlite::types::Value::Text(s) => SqlValue::Text(s),
            rusqlite::types::Value::Blob(b) => SqlValue::Blob(b),
        }
    }
}

macro_rules! impl_from_for_sql_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(value: $ty) -> Self {
                    SqlValue::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_for_sql_value! {
    i64 => Integer,
    i32 => Integer,
    i16 => Integer,
    u32 => Integer,
    u8 => Integer,
    f64 => Real,
    f32 => Real,
    String => Text,
    &str => Text,
    Vec<u8> => Blob,
    bool => Bool,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Parameters for a single statement execution.
///
/// Positional parameters pair with `%s` markers; named parameters pair with
/// `%(name)s` markers and are keyed without the leading colon.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    #[default]
    None,
    Positional(Vec<SqlValue>),
    Named(BTreeMap<String, SqlValue>),
}

impl Params {
    /// Build a named parameter set from `(name, value)` pairs.
    pub fn named<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<SqlValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Params::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Params::None => true,
            Params::Positional(values) => values.is_empty(),
            Params::Named(values) => values.is_empty(),
        }
    }
}

impl From<()> for Params {
    fn from((): ()) -> Self {
        Params::None
    }
}

impl From<Vec<SqlValue>> for Params {
    fn from(values: Vec<SqlValue>) -> Self {
        Params::Positional(values)
    }
}

impl From<&[SqlValue]> for Params {
    fn from(values: &[SqlValue]) -> Self {
        Params::Positional(values.to_vec())
    }
}

impl<T: Into<SqlValue>, const N: usize> From<[T; N]> for Params {
    fn from(values: [T; N]) -> Self {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<SqlValue>> From<BTreeMap<String, V>> for Params {
    fn from(values: BTreeMap<String, V>) -> Self {
        Params::named(values)
    }
}

impl<V: Into<SqlValue>> From<HashMap<String, V>> for Params {
    fn from(values: HashMap<String, V>) -> Self {
        Params::named(values)
    }
}

macro_rules! impl_params_for_tuple {
    ($($name:ident),+) => {
        impl<$($name: Into<SqlValue>),+> From<($($name,)+)> for Params {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Params::Positional(vec![$($name.into()),+])
            }
        }
    };
}

impl_params_for_tuple!(A);
impl_params_for_tuple!(A, B);
impl_params_for_tuple!(A, B, C);
impl_params_for_tuple!(A, B, C, D);
impl_params_for_tuple!(A, B, C, D, E);
impl_params_for_tuple!(A, B, C, D, E, F);
impl_params_for_tuple!(A, B, C, D, E, F, G);
impl_params_for_tuple!(A, B, C, D, E, F, G, H);

/// A fetched row: the column values in select-list order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(pub Vec<SqlValue>);

impl Row {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.0.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.0
    }

    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        self.0
    }
}

impl Index<usize> for Row {
    type Output = SqlValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl PartialEq<Vec<SqlValue>> for Row {
    fn eq(&self, other: &Vec<SqlValue>) -> bool {
        &self.0 == other
    }
}

impl IntoIterator for Row {
    type Item = SqlValue;
    type IntoIter = std::vec::IntoIter<SqlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
