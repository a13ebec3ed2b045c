use thiserror::Error;

/// Errors surfaced by the adapter.
///
/// Engine failures are passed through untouched in [`CompatDbError::SqliteError`];
/// the remaining variants cover the few checks the native layer performs itself.
#[derive(Debug, Error)]
pub enum CompatDbError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Unable to open database at {location}: {source}")]
    EngineOpenError {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("Conversion error in column {column} (declared {decl_type}): {message}")]
    ConversionError {
        column: String,
        decl_type: String,
        message: String,
    },

    #[error("Programming error: {0}")]
    ProgrammingError(String),
}

pub type Result<T, E = CompatDbError> = std::result::Result<T, E>;

impl From<serde_json::Error> for CompatDbError {
    fn from(err: serde_json::Error) -> Self {
        CompatDbError::ConfigError(format!("invalid connect options: {err}"))
    }
}
