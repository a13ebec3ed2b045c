//! Advisory warnings.
//!
//! None of these are errors: the call that triggers one still completes. They
//! are emitted as `tracing` events at `WARN` level under the
//! `pyformat_sqlite::warnings` target, each with a stable `kind` field, so a
//! test harness or log pipeline can pick them up.

use std::fmt;

pub const TARGET: &str = "pyformat_sqlite::warnings";

/// Conditions reported on the warnings channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// `execute`/`executemany` was called on the connection instead of a cursor.
    DirectConnectionExecute { method: &'static str },
    /// A SELECT went through `Cursor::execute`, which always reports `-1`.
    SelectRowCount,
    /// Placeholder-shaped tokens other than `%s` / `%(name)s` survived translation.
    UnsupportedPlaceholder { tokens: Vec<String> },
}

impl Warning {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::DirectConnectionExecute { .. } => "direct_connection_execute",
            Warning::SelectRowCount => "select_rowcount",
            Warning::UnsupportedPlaceholder { .. } => "unsupported_placeholder",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DirectConnectionExecute { method } => write!(
                f,
                "the emulated client does not allow calling {method}() directly on the connection; use a cursor"
            ),
            Warning::SelectRowCount => f.write_str(
                "SELECT statements always return -1, do not depend on this value in your code",
            ),
            Warning::UnsupportedPlaceholder { tokens } => write!(
                f,
                "placeholders other than %s / %(name)s found in the SQL statement ({}), this is probably an error; the emulated client does not support these",
                tokens.join(", ")
            ),
        }
    }
}

/// Emit a warning on the channel.
pub fn emit(warning: &Warning) {
    tracing::warn!(target: TARGET, kind = warning.kind(), "{warning}");
}
