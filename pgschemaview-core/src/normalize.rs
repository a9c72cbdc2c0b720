//! Folds flat catalog rows into the nested [`SchemaCatalog`] model.
//!
//! Rows are grouped under typed composite keys and every group is re-sorted by
//! ordinal position, so the result depends only on the rows themselves and
//! never on the order in which they arrived. Column flags are computed last,
//! from the finished key collections.
//!
//! # Example
//! ```rust
//! use pgschemaview_core::catalog::{CatalogSnapshot, RawColumn, RawTable, TableKind};
//! use pgschemaview_core::normalize::normalize;
//!
//! let snapshot = CatalogSnapshot {
//!     tables: vec![RawTable {
//!         schema: "public".to_string(),
//!         name: "users".to_string(),
//!         kind: TableKind::Table,
//!     }],
//!     columns: vec![RawColumn {
//!         schema: "public".to_string(),
//!         table_name: "users".to_string(),
//!         column_name: "id".to_string(),
//!         data_type: "integer".to_string(),
//!         is_nullable: false,
//!         column_default: None,
//!         ordinal_position: 1,
//!     }],
//!     ..CatalogSnapshot::default()
//! };
//!
//! let catalog = normalize(&snapshot, false, false);
//! assert_eq!(catalog.schemas, vec!["public".to_string()]);
//! assert_eq!(catalog.tables[0].columns[0].name, "id");
//! ```

use crate::catalog::CatalogSnapshot;
use crate::models::{Column, ForeignKey, Index, PrimaryKey, SchemaCatalog, Table, UniqueConstraint};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Identity of a table within one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct TableKey {
    schema: String,
    name: String,
}

impl TableKey {
    fn new(schema: &str, name: &str) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
        }
    }
}

/// Identity of a named constraint or index on a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct ConstraintKey {
    table: TableKey,
    name: String,
}

impl ConstraintKey {
    fn new(schema: &str, table: &str, name: &str) -> Self {
        Self {
            table: TableKey::new(schema, table),
            name: name.to_string(),
        }
    }
}

/// A column's slot inside a key, constraint, or index
#[derive(Debug, Clone)]
struct Member {
    position: i32,
    column: String,
}

#[derive(Debug)]
struct ForeignKeyGroup {
    pairs: Vec<(Member, String)>,
    referenced_schema: String,
    referenced_table: String,
    on_update: Option<String>,
    on_delete: Option<String>,
}

#[derive(Debug)]
struct IndexGroup {
    members: Vec<Member>,
    is_unique: bool,
    index_type: String,
}

/// Row counts dropped because their table was not in the snapshot
#[derive(Debug, Default)]
struct Orphans {
    columns: usize,
    primary_keys: usize,
    unique_constraints: usize,
    foreign_keys: usize,
    indexes: usize,
}

/// Sorts members by ordinal position (column name breaks ties) and keeps
/// only the names.
fn ordered_columns(mut members: Vec<Member>) -> Vec<String> {
    members.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.column.cmp(&b.column))
    });
    members.into_iter().map(|member| member.column).collect()
}

/// Builds the normalized catalog from one snapshot of raw rows.
///
/// Primary keys are always folded in. Unique constraints and foreign keys are
/// only included when `include_constraints` is set, indexes only when
/// `include_indexes` is set. Rows that reference a table missing from the
/// table row set are dropped silently.
pub fn normalize(
    snapshot: &CatalogSnapshot,
    include_indexes: bool,
    include_constraints: bool,
) -> SchemaCatalog {
    let mut tables: BTreeMap<TableKey, Table> = BTreeMap::new();
    let mut schemas: BTreeSet<String> = BTreeSet::new();
    let mut orphans = Orphans::default();

    for raw in &snapshot.tables {
        schemas.insert(raw.schema.clone());
        tables
            .entry(TableKey::new(&raw.schema, &raw.name))
            .or_insert_with(|| Table::new(raw.schema.as_str(), raw.name.as_str(), raw.kind));
    }

    fold_columns(snapshot, &mut tables, &mut orphans);
    fold_primary_keys(snapshot, &mut tables, &mut orphans);

    if include_constraints {
        fold_unique_constraints(snapshot, &mut tables, &mut orphans);
        fold_foreign_keys(snapshot, &mut tables, &mut orphans);
    }

    if include_indexes {
        fold_indexes(snapshot, &mut tables, &mut orphans);
    }

    for table in tables.values_mut() {
        apply_key_flags(table);
    }

    if orphans.columns
        + orphans.primary_keys
        + orphans.unique_constraints
        + orphans.foreign_keys
        + orphans.indexes
        > 0
    {
        tracing::debug!(
            "Dropped rows for tables outside the snapshot: {} columns, {} primary keys, {} unique constraints, {} foreign keys, {} indexes",
            orphans.columns,
            orphans.primary_keys,
            orphans.unique_constraints,
            orphans.foreign_keys,
            orphans.indexes
        );
    }

    let catalog = SchemaCatalog {
        schemas: schemas.into_iter().collect(),
        // BTreeMap order is (schema, name)
        tables: tables.into_values().collect(),
    };

    tracing::debug!(
        "Normalized {} tables across {} schemas",
        catalog.tables.len(),
        catalog.schemas.len()
    );

    catalog
}

fn fold_columns(
    snapshot: &CatalogSnapshot,
    tables: &mut BTreeMap<TableKey, Table>,
    orphans: &mut Orphans,
) {
    let mut grouped: BTreeMap<TableKey, Vec<(i32, Column)>> = BTreeMap::new();

    for raw in &snapshot.columns {
        let key = TableKey::new(&raw.schema, &raw.table_name);
        if !tables.contains_key(&key) {
            orphans.columns += 1;
            continue;
        }
        grouped.entry(key).or_default().push((
            raw.ordinal_position,
            Column {
                name: raw.column_name.clone(),
                data_type: raw.data_type.clone(),
                is_nullable: raw.is_nullable,
                default_value: raw.column_default.clone(),
                is_primary_key: false,
                is_unique: false,
            },
        ));
    }

    for (key, mut columns) in grouped {
        // Stable: duplicate positions keep arrival order
        columns.sort_by_key(|(position, _)| *position);
        if let Some(table) = tables.get_mut(&key) {
            table.columns = columns.into_iter().map(|(_, column)| column).collect();
        }
    }
}

fn fold_primary_keys(
    snapshot: &CatalogSnapshot,
    tables: &mut BTreeMap<TableKey, Table>,
    orphans: &mut Orphans,
) {
    let mut grouped: BTreeMap<TableKey, Vec<(Member, &str)>> = BTreeMap::new();

    for raw in &snapshot.primary_keys {
        grouped
            .entry(TableKey::new(&raw.schema, &raw.table_name))
            .or_default()
            .push((
                Member {
                    position: raw.ordinal_position,
                    column: raw.column_name.clone(),
                },
                raw.constraint_name.as_str(),
            ));
    }

    for (key, mut rows) in grouped {
        let Some(table) = tables.get_mut(&key) else {
            orphans.primary_keys += rows.len();
            continue;
        };

        rows.sort_by(|(a, a_name), (b, b_name)| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.column.cmp(&b.column))
                .then_with(|| a_name.cmp(b_name))
        });

        let Some(name) = rows.first().map(|(_, name)| (*name).to_string()) else {
            continue;
        };

        let distinct: HashSet<&str> = rows.iter().map(|(_, name)| *name).collect();
        if distinct.len() > 1 {
            tracing::warn!(
                "Table {}.{} reports {} primary key constraint names; using '{}'",
                key.schema,
                key.name,
                distinct.len(),
                name
            );
        }

        table.primary_key = Some(PrimaryKey {
            name,
            columns: rows.into_iter().map(|(member, _)| member.column).collect(),
        });
    }
}

fn fold_unique_constraints(
    snapshot: &CatalogSnapshot,
    tables: &mut BTreeMap<TableKey, Table>,
    orphans: &mut Orphans,
) {
    let mut grouped: BTreeMap<ConstraintKey, Vec<Member>> = BTreeMap::new();

    for raw in &snapshot.unique_constraints {
        grouped
            .entry(ConstraintKey::new(
                &raw.schema,
                &raw.table_name,
                &raw.constraint_name,
            ))
            .or_default()
            .push(Member {
                position: raw.ordinal_position,
                column: raw.column_name.clone(),
            });
    }

    for (key, members) in grouped {
        let Some(table) = tables.get_mut(&key.table) else {
            orphans.unique_constraints += members.len();
            continue;
        };
        table.unique_constraints.push(UniqueConstraint {
            name: key.name,
            columns: ordered_columns(members),
        });
    }
}

fn fold_foreign_keys(
    snapshot: &CatalogSnapshot,
    tables: &mut BTreeMap<TableKey, Table>,
    orphans: &mut Orphans,
) {
    let mut grouped: BTreeMap<ConstraintKey, ForeignKeyGroup> = BTreeMap::new();

    for raw in &snapshot.foreign_keys {
        let group = grouped
            .entry(ConstraintKey::new(
                &raw.schema,
                &raw.table_name,
                &raw.constraint_name,
            ))
            .or_insert_with(|| ForeignKeyGroup {
                pairs: Vec::new(),
                referenced_schema: raw.referenced_schema.clone(),
                referenced_table: raw.referenced_table.clone(),
                on_update: raw.on_update.clone(),
                on_delete: raw.on_delete.clone(),
            });

        group.pairs.push((
            Member {
                position: raw.ordinal_position,
                column: raw.column_name.clone(),
            },
            raw.referenced_column.clone(),
        ));
    }

    for (key, mut group) in grouped {
        let Some(table) = tables.get_mut(&key.table) else {
            orphans.foreign_keys += group.pairs.len();
            continue;
        };

        // Local and referenced columns share one ordinal, so sorting the
        // pairs keeps them aligned index-for-index.
        group.pairs.sort_by(|(a, a_ref), (b, b_ref)| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.column.cmp(&b.column))
                .then_with(|| a_ref.cmp(b_ref))
        });
        let (columns, referenced_columns): (Vec<String>, Vec<String>) = group
            .pairs
            .into_iter()
            .map(|(member, referenced)| (member.column, referenced))
            .unzip();

        table.foreign_keys.push(ForeignKey {
            name: key.name,
            columns,
            referenced_table: group.referenced_table,
            referenced_schema: group.referenced_schema,
            referenced_columns,
            on_update: group.on_update,
            on_delete: group.on_delete,
        });
    }
}

fn fold_indexes(
    snapshot: &CatalogSnapshot,
    tables: &mut BTreeMap<TableKey, Table>,
    orphans: &mut Orphans,
) {
    let mut grouped: BTreeMap<ConstraintKey, IndexGroup> = BTreeMap::new();

    for raw in &snapshot.indexes {
        grouped
            .entry(ConstraintKey::new(
                &raw.schema,
                &raw.table_name,
                &raw.index_name,
            ))
            .or_insert_with(|| IndexGroup {
                members: Vec::new(),
                is_unique: raw.is_unique,
                index_type: raw.index_type.clone(),
            })
            .members
            .push(Member {
                position: raw.ordinal_position.unwrap_or(0),
                column: raw.column_name.clone(),
            });
    }

    for (key, group) in grouped {
        let Some(table) = tables.get_mut(&key.table) else {
            orphans.indexes += group.members.len();
            continue;
        };
        table.indexes.push(Index {
            name: key.name,
            columns: ordered_columns(group.members),
            is_unique: group.is_unique,
            index_type: group.index_type,
        });
    }
}

/// Recomputes `is_primary_key` / `is_unique` from the table's key collections.
///
/// Only single-column unique constraints mark a column as unique.
fn apply_key_flags(table: &mut Table) {
    let primary: HashSet<String> = table
        .primary_key
        .iter()
        .flat_map(|pk| pk.columns.iter().cloned())
        .collect();
    let unique: HashSet<String> = table
        .unique_constraints
        .iter()
        .filter(|constraint| constraint.columns.len() == 1)
        .flat_map(|constraint| constraint.columns.iter().cloned())
        .collect();

    for column in &mut table.columns {
        column.is_primary_key = primary.contains(&column.name);
        column.is_unique = unique.contains(&column.name);
    }
}
