use std::collections::BTreeMap;
use std::time::Duration;

use rusqlite::OpenFlags;
use serde::Deserialize;

use crate::connection::Connection;
use crate::conversion::TypeRegistry;
use crate::error::{CompatDbError, Result};

/// Transaction mode used for the implicit `BEGIN` issued before DML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IsolationLevel {
    Deferred,
    Immediate,
    Exclusive,
}

impl IsolationLevel {
    pub(crate) fn begin_sql(self) -> &'static str {
        match self {
            IsolationLevel::Deferred => "BEGIN DEFERRED",
            IsolationLevel::Immediate => "BEGIN IMMEDIATE",
            IsolationLevel::Exclusive => "BEGIN EXCLUSIVE",
        }
    }
}

/// Options forwarded to SQLite when opening a [`Connection`].
///
/// Declared-type conversion is always on; `types` only decides which
/// adapters and converters take part. The struct deserializes from a plain
/// options map, see [`ConnectOptions::from_map`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectOptions {
    /// Seconds to wait on a locked database before failing.
    pub timeout: f64,
    /// `None` runs in autocommit mode; otherwise DML opens a transaction that
    /// lasts until `commit` or `rollback`.
    pub isolation_level: Option<IsolationLevel>,
    pub read_only: bool,
    /// Capacity of the prepared statement cache.
    pub cached_statements: usize,
    /// `PRAGMA name = value` pairs applied after opening, in name order.
    pub pragmas: BTreeMap<String, String>,
    #[serde(skip)]
    pub types: TypeRegistry,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: 5.0,
            isolation_level: Some(IsolationLevel::Deferred),
            read_only: false,
            cached_statements: 128,
            pragmas: BTreeMap::new(),
            types: TypeRegistry::default(),
        }
    }
}

impl ConnectOptions {
    #[must_use]
    pub fn builder() -> ConnectOptionsBuilder {
        ConnectOptionsBuilder::new()
    }

    /// Build options from a string-keyed map such as `{"timeout": 1.5, "isolation_level": null}`.
    ///
    /// # Errors
    /// Returns `CompatDbError::ConfigError` for unknown keys or mistyped values.
    pub fn from_map(map: serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }

    fn busy_timeout(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.timeout).map_err(|e| {
            CompatDbError::ConfigError(format!("invalid timeout {}: {e}", self.timeout))
        })
    }

    fn open_flags(&self) -> OpenFlags {
        let access = if self.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        };
        access | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX
    }
}

/// Fluent builder for [`ConnectOptions`].
#[derive(Debug, Clone, Default)]
pub struct ConnectOptionsBuilder {
    opts: ConnectOptions,
}

impl ConnectOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timeout(mut self, seconds: f64) -> Self {
        self.opts.timeout = seconds;
        self
    }

    #[must_use]
    pub fn isolation_level(mut self, level: Option<IsolationLevel>) -> Self {
        self.opts.isolation_level = level;
        self
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.opts.read_only = read_only;
        self
    }

    #[must_use]
    pub fn cached_statements(mut self, capacity: usize) -> Self {
        self.opts.cached_statements = capacity;
        self
    }

    #[must_use]
    pub fn pragma(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.pragmas.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn types(mut self, types: TypeRegistry) -> Self {
        self.opts.types = types;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectOptions {
        self.opts
    }

    /// Open a [`Connection`] with these options.
    ///
    /// # Errors
    /// Returns `CompatDbError::EngineOpenError` if the store cannot be opened.
    pub fn open(self, location: &str) -> Result<Connection> {
        Connection::open(location, self.finish())
    }
}

fn is_pragma_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Open the underlying `rusqlite` connection and apply the options to it.
pub(crate) fn open_connection(
    location: &str,
    opts: &ConnectOptions,
) -> Result<rusqlite::Connection> {
    let timeout = opts.busy_timeout()?;
    if let Some(bad) = opts.pragmas.keys().find(|name| !is_pragma_name(name)) {
        return Err(CompatDbError::ConfigError(format!(
            "invalid pragma name {bad:?}"
        )));
    }

    let conn = rusqlite::Connection::open_with_flags(location, opts.open_flags()).map_err(
        |source| CompatDbError::EngineOpenError {
            location: location.to_string(),
            source,
        },
    )?;
    conn.busy_timeout(timeout)?;
    conn.set_prepared_statement_cache_capacity(opts.cached_statements);
    for (name, value) in &opts.pragmas {
        let literal = value.replace('\'', "''");
        conn.execute_batch(&format!("PRAGMA {name} = '{literal}';"))?;
    }
    Ok(conn)
}
