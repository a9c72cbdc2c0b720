//! Normalized schema model shared by every renderer.
//!
//! Built once per run by [`crate::normalize::normalize`] and treated as
//! read-only afterwards. The serde representation doubles as the JSON output
//! format, so field names and optional-field handling here are part of the
//! wire contract.

use serde::{Deserialize, Serialize};

pub use crate::catalog::TableKind;

/// Referential action value the renderers treat as "nothing to show"
pub const NO_ACTION: &str = "NO ACTION";

/// Schemas and tables in canonical display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Distinct schema names, sorted
    pub schemas: Vec<String>,
    /// Tables sorted by `(schema, name)`
    pub tables: Vec<Table>,
}

/// A table, view, or materialized view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub kind: TableKind,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,
    pub unique_constraints: Vec<UniqueConstraint>,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<Index>,
}

/// Table column. `is_primary_key` and `is_unique` are derived from the
/// owning table's key collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    /// Explicitly `null` in JSON when the column has no default
    #[serde(default)]
    pub default_value: Option<String>,
    pub is_primary_key: bool,
    pub is_unique: bool,
}

/// Primary key constraint, columns in key order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub name: String,
    pub columns: Vec<String>,
}

/// Unique constraint, columns in key order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    pub name: String,
    pub columns: Vec<String>,
}

/// Foreign key constraint.
///
/// `columns[i]` references `referenced_columns[i]`; both vectors are always
/// the same length and are never reordered independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_schema: String,
    pub referenced_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
}

/// Secondary index that does not back a constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub is_unique: bool,
    /// Access method (btree, gin, gist, ...)
    #[serde(rename = "type")]
    pub index_type: String,
}

impl SchemaCatalog {
    /// Returns true when there are no tables to show
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables of one schema, in catalog order
    pub fn tables_in<'a>(&'a self, schema: &'a str) -> impl Iterator<Item = &'a Table> + 'a {
        self.tables.iter().filter(move |table| table.schema == schema)
    }

    /// Looks a table up by schema and name
    pub fn table(&self, schema: &str, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|table| table.schema == schema && table.name == name)
    }
}

impl Table {
    /// Creates a table shell with no columns, keys, or indexes
    pub fn new(schema: impl Into<String>, name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            kind,
            columns: Vec::new(),
            primary_key: None,
            unique_constraints: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Finds a column by exact name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Unique constraints spanning more than one column.
    ///
    /// Single-column ones are already visible through [`Column::is_unique`].
    pub fn multi_column_uniques(&self) -> impl Iterator<Item = &UniqueConstraint> {
        self.unique_constraints
            .iter()
            .filter(|unique| unique.columns.len() > 1)
    }
}

impl ForeignKey {
    /// Whether this key points at the given table
    pub fn references(&self, schema: &str, table: &str) -> bool {
        self.referenced_schema == schema && self.referenced_table == table
    }

    /// Referential actions worth displaying, `NO ACTION` suppressed.
    ///
    /// Yields `ON DELETE x` before `ON UPDATE y`.
    pub fn display_actions(&self) -> Vec<String> {
        let mut actions = Vec::new();
        if let Some(on_delete) = self.on_delete.as_deref().filter(|a| *a != NO_ACTION) {
            actions.push(format!("ON DELETE {}", on_delete));
        }
        if let Some(on_update) = self.on_update.as_deref().filter(|a| *a != NO_ACTION) {
            actions.push(format!("ON UPDATE {}", on_update));
        }
        actions
    }

    /// Referenced table name, schema-qualified only when it lives in a
    /// different schema than `from_schema`
    pub fn display_target(&self, from_schema: &str) -> String {
        if self.referenced_schema == from_schema {
            self.referenced_table.clone()
        } else {
            format!("{}.{}", self.referenced_schema, self.referenced_table)
        }
    }
}
