//! Helper utilities for SQL-backed catalog sources.

use crate::{Result, error::SchemaViewError};
use sqlx::{Row, postgres::PgRow};

/// Extension trait for extracting typed values from catalog rows with
/// consistent error context.
///
/// # Example
/// ```rust,ignore
/// use pgschemaview_core::adapters::helpers::RowExt;
///
/// let name: String = row.get_field("column_name", "columns")?;
/// let default: Option<String> = row.get_field("column_default", "columns")?;
/// ```
pub trait RowExt {
    /// Extracts a typed field, naming the catalog query in the error
    fn get_field<'r, T>(&'r self, field_name: &str, query: &str) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>;
}

impl RowExt for PgRow {
    fn get_field<'r, T>(&'r self, field_name: &str, query: &str) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        self.try_get(field_name).map_err(|e| {
            SchemaViewError::introspection_failed(
                format!("Failed to read field '{}' from {} query", field_name, query),
                e,
            )
        })
    }
}
