//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::connection::{Connection, connect};
pub use crate::conversion::{Adapter, Converter, TypeRegistry, adapters, converters};
pub use crate::cursor::Cursor;
pub use crate::error::CompatDbError;
pub use crate::sqlite::{ColumnInfo, ConnectOptions, ConnectOptionsBuilder, IsolationLevel};
pub use crate::translation::{translate, unsupported_placeholders};
pub use crate::types::{Params, Row, SqlValue, ValueKind};
pub use crate::warnings::Warning;
