//! Raw catalog rows as returned by the introspection queries.
//!
//! One row per table, per column, per key column and per index column. These
//! are flat and repetitive on purpose; [`crate::normalize`] folds them into the
//! nested model in [`crate::models`].

use serde::{Deserialize, Serialize};

/// Kind of relation a table row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    #[default]
    Table,
    View,
    MaterializedView,
}

impl TableKind {
    /// Maps a catalog kind label (`table`, `view`, `materialized_view`).
    ///
    /// Unknown labels fall back to [`TableKind::Table`], matching how the
    /// catalog query classifies anything it does not recognize.
    pub fn from_catalog(kind: &str) -> Self {
        match kind {
            "view" => Self::View,
            "materialized_view" => Self::MaterializedView,
            _ => Self::Table,
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Table => write!(f, "table"),
            TableKind::View => write!(f, "view"),
            TableKind::MaterializedView => write!(f, "materialized_view"),
        }
    }
}

/// One row per relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub schema: String,
    pub name: String,
    pub kind: TableKind,
}

/// One row per column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumn {
    pub schema: String,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub column_default: Option<String>,
    pub ordinal_position: i32,
}

/// One row per primary-key column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPrimaryKey {
    pub schema: String,
    pub table_name: String,
    pub constraint_name: String,
    pub column_name: String,
    pub ordinal_position: i32,
}

/// One row per unique-constraint column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUniqueConstraint {
    pub schema: String,
    pub table_name: String,
    pub constraint_name: String,
    pub column_name: String,
    pub ordinal_position: i32,
}

/// One row per foreign-key column pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawForeignKey {
    pub schema: String,
    pub table_name: String,
    pub constraint_name: String,
    pub column_name: String,
    pub ordinal_position: i32,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_column: String,
    pub on_update: Option<String>,
    pub on_delete: Option<String>,
}

/// One row per index column. Indexes backing a constraint are not reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIndex {
    pub schema: String,
    pub table_name: String,
    pub index_name: String,
    pub column_name: String,
    pub ordinal_position: Option<i32>,
    pub is_unique: bool,
    pub index_type: String,
}

/// The six row sets from a single introspection pass.
///
/// Must be fully materialized before normalization; nothing here streams.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub tables: Vec<RawTable>,
    pub columns: Vec<RawColumn>,
    pub primary_keys: Vec<RawPrimaryKey>,
    pub unique_constraints: Vec<RawUniqueConstraint>,
    pub foreign_keys: Vec<RawForeignKey>,
    pub indexes: Vec<RawIndex>,
}

impl CatalogSnapshot {
    /// Total number of rows across all row sets
    pub fn row_count(&self) -> usize {
        self.tables.len()
            + self.columns.len()
            + self.primary_keys.len()
            + self.unique_constraints.len()
            + self.foreign_keys.len()
            + self.indexes.len()
    }
}
