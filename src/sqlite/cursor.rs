use std::collections::VecDeque;

use crate::error::{CompatDbError, Result};
use crate::translation::{is_dml, statement_keyword};
use crate::types::{Params, Row};

use super::connection::NativeConnection;
use super::params::bind_params;
use super::query::{ColumnInfo, column_info, extract_row};

/// DB-API style cursor over a [`NativeConnection`].
///
/// Result rows are read eagerly when a statement runs and handed out by the
/// fetch methods. `rowcount` is the number of changed rows for
/// INSERT/UPDATE/DELETE/REPLACE and `-1` for everything else.
#[derive(Debug)]
pub struct NativeCursor<'conn> {
    conn: &'conn NativeConnection,
    rows: VecDeque<Row>,
    description: Option<Vec<ColumnInfo>>,
    rowcount: i64,
    lastrowid: Option<i64>,
    arraysize: usize,
    closed: bool,
}

impl<'conn> NativeCursor<'conn> {
    pub(crate) fn new(conn: &'conn NativeConnection) -> Self {
        conn.cursor_opened();
        Self {
            conn,
            rows: VecDeque::new(),
            description: None,
            rowcount: -1,
            lastrowid: None,
            arraysize: 1,
            closed: false,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(CompatDbError::ProgrammingError(
                "Cannot operate on a closed cursor.".into(),
            ))
        } else {
            Ok(())
        }
    }

    fn reset(&mut self) {
        self.rows.clear();
        self.description = None;
        self.rowcount = -1;
    }

    fn record_insert(&mut self, sql: &str) {
        let inserts = statement_keyword(sql).is_some_and(|kw| {
            kw.eq_ignore_ascii_case("INSERT") || kw.eq_ignore_ascii_case("REPLACE")
        });
        if inserts {
            self.lastrowid = Some(self.conn.raw().last_insert_rowid());
        }
    }

    /// Run a single statement.
    ///
    /// # Errors
    /// Returns `CompatDbError` if the cursor is closed, binding fails, or SQLite
    /// rejects the statement.
    pub fn execute(&mut self, sql: &str, params: &Params) -> Result<()> {
        self.ensure_open()?;
        self.reset();
        let conn = self.conn;
        let dml = is_dml(sql);
        let mut stmt = conn.raw().prepare_cached(sql)?;
        bind_params(&mut stmt, params, conn.types())?;
        if dml {
            conn.begin_implicit()?;
        }

        if stmt.column_count() > 0 {
            let columns = column_info(&stmt);
            let mut fetched = VecDeque::new();
            let mut rows = stmt.raw_query();
            while let Some(row) = rows.next()? {
                fetched.push_back(extract_row(row, &columns, conn.types())?);
            }
            self.rows = fetched;
            self.description = Some(columns);
            if dml {
                self.rowcount = conn.raw().changes() as i64;
            }
        } else {
            let changed = stmt.raw_execute()?;
            if dml {
                self.rowcount = changed as i64;
            }
        }
        self.record_insert(sql);
        Ok(())
    }

    /// Run one statement once per parameter set; `rowcount` is the sum of changed rows.
    ///
    /// # Errors
    /// Returns `CompatDbError::ProgrammingError` for statements that return rows,
    /// otherwise whatever binding or execution reports for the failing set.
    pub fn executemany<I>(&mut self, sql: &str, param_sets: I) -> Result<()>
    where
        I: IntoIterator<Item = Params>,
    {
        self.ensure_open()?;
        self.reset();
        let conn = self.conn;
        let dml = is_dml(sql);
        let mut stmt = conn.raw().prepare_cached(sql)?;
        if stmt.column_count() > 0 {
            return Err(CompatDbError::ProgrammingError(
                "executemany() can only execute DML statements.".into(),
            ));
        }
        if dml {
            conn.begin_implicit()?;
        }

        let mut total: i64 = 0;
        for params in param_sets {
            bind_params(&mut stmt, &params, conn.types())?;
            total += stmt.raw_execute()? as i64;
        }
        if dml {
            self.rowcount = total;
        }
        self.record_insert(sql);
        Ok(())
    }

    /// # Errors
    /// Returns `CompatDbError::ProgrammingError` if the cursor is closed.
    pub fn fetchone(&mut self) -> Result<Option<Row>> {
        self.ensure_open()?;
        Ok(self.rows.pop_front())
    }

    /// Up to `size` rows, `arraysize` when `None`.
    ///
    /// # Errors
    /// Returns `CompatDbError::ProgrammingError` if the cursor is closed.
    pub fn fetchmany(&mut self, size: Option<usize>) -> Result<Vec<Row>> {
        self.ensure_open()?;
        let take = size.unwrap_or(self.arraysize).min(self.rows.len());
        Ok(self.rows.drain(..take).collect())
    }

    /// # Errors
    /// Returns `CompatDbError::ProgrammingError` if the cursor is closed.
    pub fn fetchall(&mut self) -> Result<Vec<Row>> {
        self.ensure_open()?;
        Ok(self.rows.drain(..).collect())
    }

    #[must_use]
    pub fn rowcount(&self) -> i64 {
        self.rowcount
    }

    #[must_use]
    pub fn lastrowid(&self) -> Option<i64> {
        self.lastrowid
    }

    /// Columns of the last row-returning statement.
    #[must_use]
    pub fn description(&self) -> Option<&[ColumnInfo]> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn arraysize(&self) -> usize {
        self.arraysize
    }

    pub fn set_arraysize(&mut self, size: usize) {
        self.arraysize = size;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Drop pending rows and release the cursor. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.reset();
        self.closed = true;
        self.conn.cursor_closed();
    }
}

impl Drop for NativeCursor<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
