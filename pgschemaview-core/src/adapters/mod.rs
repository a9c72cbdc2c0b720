//! Catalog sources: where the raw catalog rows come from.
//!
//! # Module Structure
//! - `helpers`: typed row extraction shared by the SQL-backed sources
//! - `postgres`: the PostgreSQL system-catalog source (feature `postgresql`)

use crate::{Result, catalog::CatalogSnapshot};
use async_trait::async_trait;

#[cfg(feature = "postgresql")]
pub mod helpers;
#[cfg(feature = "postgresql")]
pub mod postgres;

/// Produces the raw catalog rows for a set of schemas.
///
/// # Security Guarantees
/// - Implementations only read catalog metadata
/// - Connection strings never appear in errors or logs unredacted
///
/// # Object Safety
/// This trait is object-safe and can be used as `Box<dyn CatalogSource>`.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Reads every table, column, key, constraint and index row belonging to
    /// `schemas`.
    ///
    /// # Errors
    /// Returns [`crate::SchemaViewError::Introspection`] if any catalog query
    /// fails. Partial results are never returned.
    async fn introspect(&self, schemas: &[String]) -> Result<CatalogSnapshot>;
}

/// Serves a fixed snapshot. Useful for rendering saved catalogs and in tests.
#[async_trait]
impl CatalogSource for CatalogSnapshot {
    async fn introspect(&self, schemas: &[String]) -> Result<CatalogSnapshot> {
        let wanted = |schema: &String| schemas.contains(schema);
        Ok(CatalogSnapshot {
            tables: self.tables.iter().filter(|r| wanted(&r.schema)).cloned().collect(),
            columns: self.columns.iter().filter(|r| wanted(&r.schema)).cloned().collect(),
            primary_keys: self
                .primary_keys
                .iter()
                .filter(|r| wanted(&r.schema))
                .cloned()
                .collect(),
            unique_constraints: self
                .unique_constraints
                .iter()
                .filter(|r| wanted(&r.schema))
                .cloned()
                .collect(),
            foreign_keys: self
                .foreign_keys
                .iter()
                .filter(|r| wanted(&r.schema))
                .cloned()
                .collect(),
            indexes: self.indexes.iter().filter(|r| wanted(&r.schema)).cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RawColumn, RawTable, TableKind};

    fn row(schema: &str, name: &str) -> RawTable {
        RawTable {
            schema: schema.to_string(),
            name: name.to_string(),
            kind: TableKind::Table,
        }
    }

    #[tokio::test]
    async fn test_snapshot_source_filters_by_schema() {
        let snapshot = CatalogSnapshot {
            tables: vec![row("public", "users"), row("audit", "events")],
            columns: vec![RawColumn {
                schema: "audit".to_string(),
                table_name: "events".to_string(),
                column_name: "id".to_string(),
                data_type: "bigint".to_string(),
                is_nullable: false,
                column_default: None,
                ordinal_position: 1,
            }],
            ..CatalogSnapshot::default()
        };

        let source: Box<dyn CatalogSource> = Box::new(snapshot);
        let result = source
            .introspect(&["public".to_string()])
            .await
            .expect("snapshot source never fails");

        assert_eq!(result.tables, vec![row("public", "users")]);
        assert!(result.columns.is_empty());
    }
}
