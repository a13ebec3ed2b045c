use std::cell::Cell;
use std::fmt;

use crate::conversion::TypeRegistry;
use crate::error::Result;

use super::config::{ConnectOptions, IsolationLevel, open_connection};
use super::cursor::NativeCursor;

/// Owner of the `rusqlite` connection, with DB-API style transaction handling.
///
/// Statements go through here untranslated.
pub struct NativeConnection {
    conn: rusqlite::Connection,
    types: TypeRegistry,
    isolation_level: Option<IsolationLevel>,
    open_cursors: Cell<usize>,
}

impl NativeConnection {
    /// # Errors
    /// Returns `CompatDbError::EngineOpenError` if the store cannot be opened,
    /// or `CompatDbError::ConfigError` for invalid options.
    pub fn open(location: &str, options: ConnectOptions) -> Result<Self> {
        let conn = open_connection(location, &options)?;
        Ok(Self {
            conn,
            types: options.types,
            isolation_level: options.isolation_level,
            open_cursors: Cell::new(0),
        })
    }

    pub(crate) fn raw(&self) -> &rusqlite::Connection {
        &self.conn
    }

    pub(crate) fn types(&self) -> &TypeRegistry {
        &self.types
    }

    #[must_use]
    pub fn cursor(&self) -> NativeCursor<'_> {
        NativeCursor::new(self)
    }

    pub(crate) fn cursor_opened(&self) {
        self.open_cursors.set(self.open_cursors.get() + 1);
    }

    pub(crate) fn cursor_closed(&self) {
        self.open_cursors.set(self.open_cursors.get().saturating_sub(1));
    }

    /// Number of cursors created from this connection that are not closed yet.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.get()
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    #[must_use]
    pub fn total_changes(&self) -> u64 {
        self.conn.total_changes() as u64
    }

    /// Open the implicit transaction that precedes DML, unless one is already
    /// open or the connection runs in autocommit mode.
    pub(crate) fn begin_implicit(&self) -> Result<()> {
        if let Some(level) = self.isolation_level
            && self.conn.is_autocommit()
        {
            tracing::trace!(sql = level.begin_sql(), "sqlite implicit begin");
            self.conn.execute_batch(level.begin_sql())?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns `CompatDbError::SqliteError` if the commit fails.
    pub fn commit(&self) -> Result<()> {
        if self.in_transaction() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns `CompatDbError::SqliteError` if the rollback fails.
    pub fn rollback(&self) -> Result<()> {
        if self.in_transaction() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }

    /// Commit any pending transaction, then run `script` as-is.
    ///
    /// # Errors
    /// Returns `CompatDbError::SqliteError` if any statement in the script fails.
    pub fn executescript(&self, script: &str) -> Result<()> {
        self.commit()?;
        self.conn.execute_batch(script)?;
        Ok(())
    }

    /// # Errors
    /// Returns `CompatDbError::SqliteError` if SQLite refuses to close the handle.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| err.into())
    }
}

impl fmt::Debug for NativeConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeConnection")
            .field("conn", &self.conn)
            .field("isolation_level", &self.isolation_level)
            .field("open_cursors", &self.open_cursors.get())
            .finish_non_exhaustive()
    }
}
