// SQLite engine layer - the "native" connection and cursor the facade wraps.
//
// - config: open options and their application to a fresh connection
// - connection: connection ownership and transaction handling
// - cursor: statement execution, rowcount and fetch state
// - params: binding positional and named parameters
// - query: row extraction through the type registry

pub mod config;
pub mod connection;
pub mod cursor;
mod params;
pub mod query;

pub use config::{ConnectOptions, ConnectOptionsBuilder, IsolationLevel};
pub use connection::NativeConnection;
pub use cursor::NativeCursor;
pub use query::ColumnInfo;
