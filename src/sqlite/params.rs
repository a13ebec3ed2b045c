use rusqlite::Statement;

use crate::conversion::TypeRegistry;
use crate::error::{CompatDbError, Result};
use crate::types::Params;

/// Bind `params` onto a prepared statement, running values through the registry's adapters.
///
/// Positional parameters must match the statement's placeholder count. Named
/// parameters are looked up by placeholder name without its `:`/`@`/`$` prefix;
/// extra entries in the map are ignored.
///
/// # Errors
/// Returns `CompatDbError::SqliteError` for count or name mismatches, the
/// adapter's error for unconvertible values, and `CompatDbError::ProgrammingError`
/// when named parameters meet `?` placeholders.
pub(crate) fn bind_params(
    stmt: &mut Statement<'_>,
    params: &Params,
    types: &TypeRegistry,
) -> Result<()> {
    let expected = stmt.parameter_count();
    match params {
        Params::None => {
            if expected != 0 {
                return Err(rusqlite::Error::InvalidParameterCount(0, expected).into());
            }
        }
        Params::Positional(values) => {
            if values.len() != expected {
                return Err(rusqlite::Error::InvalidParameterCount(values.len(), expected).into());
            }
            for (idx, value) in values.iter().enumerate() {
                stmt.raw_bind_parameter(idx + 1, types.to_sqlite(value)?)?;
            }
        }
        Params::Named(values) => {
            for idx in 1..=expected {
                let name = stmt.parameter_name(idx).map(str::to_owned).ok_or_else(|| {
                    CompatDbError::ProgrammingError(format!(
                        "named parameters supplied but placeholder {idx} is positional"
                    ))
                })?;
                let key = name.trim_start_matches([':', '@', '$']);
                let value = values
                    .get(key)
                    .ok_or_else(|| rusqlite::Error::InvalidParameterName(name.clone()))?;
                stmt.raw_bind_parameter(idx, types.to_sqlite(value)?)?;
            }
        }
    }
    Ok(())
}
