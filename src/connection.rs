use crate::cursor::Cursor;
use crate::error::Result;
use crate::sqlite::{ConnectOptions, NativeConnection};
use crate::translation::translate;
use crate::types::Params;
use crate::warnings::{Warning, emit};

/// Connection facade: owns one SQLite connection and hands out [`Cursor`]s.
///
/// ```rust
/// use pyformat_sqlite::prelude::*;
///
/// # fn main() -> Result<(), CompatDbError> {
/// let conn = Connection::open(":memory:", ConnectOptions::default())?;
/// conn.executescript("CREATE TABLE users (id INTEGER, name TEXT);")?;
/// let inserted = conn.with_cursor(|cur| cur.execute("INSERT INTO users VALUES (%s, %s)", (1, "foo")))?;
/// assert_eq!(inserted, 1);
/// conn.commit()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Connection {
    native: NativeConnection,
}

impl Connection {
    /// Open or create the database at `location` (a path, `:memory:`, or a `file:` URI).
    ///
    /// # Errors
    /// Returns `CompatDbError::EngineOpenError` if SQLite cannot open the store and
    /// `CompatDbError::ConfigError` for invalid options.
    pub fn open(location: &str, options: ConnectOptions) -> Result<Self> {
        let native = NativeConnection::open(location, options)?;
        tracing::debug!(location, "opened sqlite connection");
        Ok(Self { native })
    }

    /// A new cursor bound to this connection.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self.native.cursor())
    }

    /// Run `body` with a fresh cursor and close it afterwards, whatever the outcome.
    ///
    /// The body's result, error included, is returned unchanged.
    ///
    /// # Errors
    /// Returns whatever `body` returns.
    pub fn with_cursor<F, R>(&self, body: F) -> Result<R>
    where
        F: FnOnce(&mut Cursor<'_>) -> Result<R>,
    {
        let mut cursor = self.cursor();
        let outcome = body(&mut cursor);
        cursor.close();
        outcome
    }

    /// # Errors
    /// Returns `CompatDbError::SqliteError` if SQLite refuses to close the handle.
    pub fn close(self) -> Result<()> {
        tracing::debug!("closing sqlite connection");
        self.native.close()
    }

    /// # Errors
    /// Returns `CompatDbError::SqliteError` if the commit fails.
    pub fn commit(&self) -> Result<()> {
        tracing::debug!("committing sqlite connection");
        self.native.commit()
    }

    /// # Errors
    /// Returns `CompatDbError::SqliteError` if the rollback fails.
    pub fn rollback(&self) -> Result<()> {
        self.native.rollback()
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.native.in_transaction()
    }

    /// Cursors created from this connection that are still open.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.native.open_cursors()
    }

    #[must_use]
    pub fn total_changes(&self) -> u64 {
        self.native.total_changes()
    }

    /// Run a multi-statement script in SQLite's own dialect.
    ///
    /// No placeholder translation happens here; this exists for loading schema
    /// and fixtures in test setup. A pending transaction is committed first.
    ///
    /// # Errors
    /// Returns `CompatDbError::SqliteError` if any statement fails.
    pub fn executescript(&self, script: &str) -> Result<()> {
        self.native.executescript(script)
    }

    /// Execute on the connection directly. The emulated client forbids this, so
    /// a warning is emitted every time; prefer a [`Cursor`].
    ///
    /// Returns the row count without any SELECT special-casing.
    ///
    /// # Errors
    /// Returns `CompatDbError` from binding or execution.
    pub fn execute(&self, sql: &str, params: impl Into<Params>) -> Result<i64> {
        emit(&Warning::DirectConnectionExecute { method: "execute" });
        let translated = translate(sql);
        let mut cursor = self.native.cursor();
        cursor.execute(&translated, &params.into())?;
        Ok(cursor.rowcount())
    }

    /// Batch variant of [`Connection::execute`], with the same warning.
    ///
    /// # Errors
    /// Returns `CompatDbError` from binding or execution.
    pub fn executemany<I, P>(&self, sql: &str, param_sets: I) -> Result<i64>
    where
        I: IntoIterator<Item = P>,
        P: Into<Params>,
    {
        emit(&Warning::DirectConnectionExecute {
            method: "executemany",
        });
        let translated = translate(sql);
        let mut cursor = self.native.cursor();
        cursor.executemany(&translated, param_sets.into_iter().map(Into::into))?;
        Ok(cursor.rowcount())
    }
}

/// Open `location` with default options.
///
/// # Errors
/// Returns `CompatDbError::EngineOpenError` if SQLite cannot open the store.
pub fn connect(location: &str) -> Result<Connection> {
    Connection::open(location, ConnectOptions::default())
}
