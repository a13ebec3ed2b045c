//! Run code written for a `%s` / `%(name)s` database client against SQLite.
//!
//! [`Connection`] and [`Cursor`] mirror the client's connection and cursor
//! objects. Statements are translated to SQLite's `?` / `:name` placeholders
//! on the way through, and `Cursor::execute` keeps the client's rowcount
//! contract, including `-1` for SELECT.

pub mod connection;
pub mod conversion;
pub mod cursor;
pub mod error;
pub mod prelude;
pub mod sqlite;
pub mod translation;
pub mod types;
pub mod warnings;

pub use connection::{Connection, connect};
pub use conversion::TypeRegistry;
pub use cursor::Cursor;
pub use error::CompatDbError;
pub use sqlite::{ConnectOptions, IsolationLevel};
pub use translation::translate;
pub use types::{Params, Row, SqlValue, ValueKind};
