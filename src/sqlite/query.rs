use rusqlite::types::Value;

use crate::conversion::TypeRegistry;
use crate::error::Result;
use crate::types::Row;

/// Name and declared type of a result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: Option<String>,
}

pub(crate) fn column_info(stmt: &rusqlite::Statement<'_>) -> Vec<ColumnInfo> {
    stmt.columns()
        .iter()
        .map(|col| ColumnInfo {
            name: col.name().to_string(),
            decl_type: col.decl_type().map(str::to_string),
        })
        .collect()
}

/// Extract a [`Row`], converting columns whose declared type has a registered converter.
///
/// # Errors
/// Returns `CompatDbError` if a value cannot be read or a converter rejects it.
pub(crate) fn extract_row(
    row: &rusqlite::Row<'_>,
    columns: &[ColumnInfo],
    types: &TypeRegistry,
) -> Result<Row> {
    let mut values = Vec::with_capacity(columns.len());
    for (idx, column) in columns.iter().enumerate() {
        let raw: Value = row.get(idx)?;
        values.push(types.from_sqlite(raw, &column.name, column.decl_type.as_deref())?);
    }
    Ok(Row(values))
}
