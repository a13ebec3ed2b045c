use crate::error::Result;
use crate::sqlite::{ColumnInfo, NativeCursor};
use crate::translation::translate;
use crate::types::{Params, Row};
use crate::warnings::{Warning, emit};

/// Cursor facade with the emulated client's calling conventions.
///
/// Every statement is translated from `%s` / `%(name)s` to SQLite placeholders
/// before it reaches the native cursor. Fetches pass straight through.
#[derive(Debug)]
pub struct Cursor<'conn> {
    native: NativeCursor<'conn>,
    last_statement: Option<String>,
}

impl<'conn> Cursor<'conn> {
    pub(crate) fn new(native: NativeCursor<'conn>) -> Self {
        Self {
            native,
            last_statement: None,
        }
    }

    /// Execute one statement.
    ///
    /// Returns the affected row count, except when the translated statement
    /// starts with `SELECT` (case-sensitive): then a warning is emitted and the
    /// result is always `-1`, however many rows matched.
    ///
    /// # Errors
    /// Returns `CompatDbError` from binding or execution, unchanged.
    pub fn execute(&mut self, sql: &str, params: impl Into<Params>) -> Result<i64> {
        let translated = translate(sql);
        tracing::debug!(sql = %translated, "cursor execute");
        self.last_statement = Some(translated.to_string());
        self.native.execute(&translated, &params.into())?;
        if !translated.starts_with("SELECT") {
            return Ok(self.native.rowcount());
        }
        emit(&Warning::SelectRowCount);
        Ok(-1)
    }

    /// Execute one statement per parameter set and return the summed row count.
    ///
    /// # Errors
    /// Returns `CompatDbError` from binding or execution, unchanged.
    pub fn executemany<I, P>(&mut self, sql: &str, param_sets: I) -> Result<i64>
    where
        I: IntoIterator<Item = P>,
        P: Into<Params>,
    {
        let translated = translate(sql);
        tracing::debug!(sql = %translated, "cursor executemany");
        self.last_statement = Some(translated.to_string());
        self.native
            .executemany(&translated, param_sets.into_iter().map(Into::into))?;
        Ok(self.native.rowcount())
    }

    /// # Errors
    /// Returns `CompatDbError::ProgrammingError` if the cursor is closed.
    pub fn fetchone(&mut self) -> Result<Option<Row>> {
        self.native.fetchone()
    }

    /// Up to `size` rows; `None` uses [`Cursor::arraysize`].
    ///
    /// # Errors
    /// Returns `CompatDbError::ProgrammingError` if the cursor is closed.
    pub fn fetchmany(&mut self, size: Option<usize>) -> Result<Vec<Row>> {
        self.native.fetchmany(size)
    }

    /// # Errors
    /// Returns `CompatDbError::ProgrammingError` if the cursor is closed.
    pub fn fetchall(&mut self) -> Result<Vec<Row>> {
        self.native.fetchall()
    }

    /// The last statement as sent to SQLite. Diagnostic only.
    #[must_use]
    pub fn last_statement(&self) -> Option<&str> {
        self.last_statement.as_deref()
    }

    #[must_use]
    pub fn rowcount(&self) -> i64 {
        self.native.rowcount()
    }

    #[must_use]
    pub fn lastrowid(&self) -> Option<i64> {
        self.native.lastrowid()
    }

    #[must_use]
    pub fn description(&self) -> Option<&[ColumnInfo]> {
        self.native.description()
    }

    #[must_use]
    pub fn arraysize(&self) -> usize {
        self.native.arraysize()
    }

    pub fn set_arraysize(&mut self, size: usize) {
        self.native.set_arraysize(size);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.native.is_closed()
    }

    /// Close the native cursor. Also happens on drop.
    pub fn close(&mut self) {
        self.native.close();
    }
}
