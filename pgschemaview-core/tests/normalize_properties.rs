//! Property tests for catalog normalization.
//!
//! Generates small but structurally varied snapshots, then checks that the
//! normalized model does not depend on row arrival order and that the derived
//! column flags always agree with the key collections.

use pgschemaview_core::catalog::{
    CatalogSnapshot, RawColumn, RawForeignKey, RawIndex, RawPrimaryKey, RawTable,
    RawUniqueConstraint, TableKind,
};
use pgschemaview_core::render::json::{parse_json, render_json};
use pgschemaview_core::{OutputFormat, RenderOptions, SchemaCatalog, normalize, render};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Shape of one generated table
#[derive(Debug, Clone)]
struct TableShape {
    schema: &'static str,
    columns: usize,
    primary_key_width: usize,
    has_foreign_key: bool,
    has_unique: bool,
    has_index: bool,
}

fn table_shape() -> impl Strategy<Value = TableShape> {
    (
        prop::sample::select(vec!["public", "sales", "audit"]),
        0usize..5,
        0usize..3,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(schema, columns, primary_key_width, has_foreign_key, has_unique, has_index)| {
                TableShape {
                    schema,
                    columns,
                    primary_key_width: primary_key_width.min(columns),
                    has_foreign_key,
                    has_unique,
                    has_index,
                }
            },
        )
}

/// Builds the catalog rows for a set of table shapes. Table `i` is named
/// `t{i}` and has columns `c0..cN` at ordinal positions `1..=N`.
fn build_snapshot(shapes: &[TableShape]) -> CatalogSnapshot {
    let mut snapshot = CatalogSnapshot::default();

    for (i, shape) in shapes.iter().enumerate() {
        let table = format!("t{}", i);
        snapshot.tables.push(RawTable {
            schema: shape.schema.to_string(),
            name: table.clone(),
            kind: if shape.columns == 0 {
                TableKind::View
            } else {
                TableKind::Table
            },
        });

        for c in 0..shape.columns {
            snapshot.columns.push(RawColumn {
                schema: shape.schema.to_string(),
                table_name: table.clone(),
                column_name: format!("c{}", c),
                data_type: "integer".to_string(),
                is_nullable: c % 2 == 1,
                column_default: None,
                ordinal_position: c as i32 + 1,
            });
        }

        for c in 0..shape.primary_key_width {
            snapshot.primary_keys.push(RawPrimaryKey {
                schema: shape.schema.to_string(),
                table_name: table.clone(),
                constraint_name: format!("{}_pkey", table),
                column_name: format!("c{}", c),
                ordinal_position: c as i32 + 1,
            });
        }

        if shape.has_unique && shape.columns >= 2 {
            // one single-column and one two-column constraint
            let last = shape.columns - 1;
            snapshot.unique_constraints.push(RawUniqueConstraint {
                schema: shape.schema.to_string(),
                table_name: table.clone(),
                constraint_name: format!("{}_c{}_key", table, last),
                column_name: format!("c{}", last),
                ordinal_position: 1,
            });
            for (position, c) in [(1, last), (2, 0)] {
                snapshot.unique_constraints.push(RawUniqueConstraint {
                    schema: shape.schema.to_string(),
                    table_name: table.clone(),
                    constraint_name: format!("{}_pair_key", table),
                    column_name: format!("c{}", c),
                    ordinal_position: position,
                });
            }
        }

        if shape.has_foreign_key && i > 0 && shape.columns >= 2 {
            // composite reference to t0, crossing the column order
            for (position, local, referenced) in [(1, 1, "k_b"), (2, 0, "k_a")] {
                snapshot.foreign_keys.push(RawForeignKey {
                    schema: shape.schema.to_string(),
                    table_name: table.clone(),
                    constraint_name: format!("fk_{}_t0", table),
                    column_name: format!("c{}", local),
                    ordinal_position: position,
                    referenced_schema: shapes[0].schema.to_string(),
                    referenced_table: "t0".to_string(),
                    referenced_column: referenced.to_string(),
                    on_update: Some("NO ACTION".to_string()),
                    on_delete: Some("CASCADE".to_string()),
                });
            }
        }

        if shape.has_index && shape.columns >= 1 {
            for c in 0..shape.columns.min(3) {
                snapshot.indexes.push(RawIndex {
                    schema: shape.schema.to_string(),
                    table_name: table.clone(),
                    index_name: format!("idx_{}", table),
                    column_name: format!("c{}", c),
                    ordinal_position: Some(c as i32 + 1),
                    is_unique: false,
                    index_type: "btree".to_string(),
                });
            }
        }
    }

    snapshot
}

/// A snapshot together with a copy whose row sets are independently shuffled
fn snapshot_and_shuffled() -> impl Strategy<Value = (CatalogSnapshot, CatalogSnapshot)> {
    prop::collection::vec(table_shape(), 1..6).prop_flat_map(|shapes| {
        let snapshot = build_snapshot(&shapes);
        (
            Just(snapshot.clone()),
            Just(snapshot.tables).prop_shuffle(),
            Just(snapshot.columns).prop_shuffle(),
            Just(snapshot.primary_keys).prop_shuffle(),
            Just(snapshot.unique_constraints).prop_shuffle(),
            Just(snapshot.foreign_keys).prop_shuffle(),
            Just(snapshot.indexes).prop_shuffle(),
        )
            .prop_map(
                |(
                    ordered,
                    tables,
                    columns,
                    primary_keys,
                    unique_constraints,
                    foreign_keys,
                    indexes,
                )| {
                    let shuffled = CatalogSnapshot {
                        tables,
                        columns,
                        primary_keys,
                        unique_constraints,
                        foreign_keys,
                        indexes,
                    };
                    (ordered, shuffled)
                },
            )
    })
}

fn assert_flags_consistent(catalog: &SchemaCatalog) {
    for table in &catalog.tables {
        let pk_columns = table
            .primary_key
            .as_ref()
            .map(|pk| pk.columns.clone())
            .unwrap_or_default();

        for column in &table.columns {
            assert_eq!(
                column.is_primary_key,
                pk_columns.contains(&column.name),
                "{}.{} primary key flag",
                table.qualified_name(),
                column.name
            );

            let single_unique = table
                .unique_constraints
                .iter()
                .any(|u| u.columns.len() == 1 && u.columns[0] == column.name);
            assert_eq!(
                column.is_unique,
                single_unique,
                "{}.{} unique flag",
                table.qualified_name(),
                column.name
            );
        }
    }
}

proptest! {
    #[test]
    fn normalization_ignores_row_order(
        (ordered, shuffled) in snapshot_and_shuffled(),
        include_indexes in any::<bool>(),
        include_constraints in any::<bool>(),
    ) {
        let expected = normalize(&ordered, include_indexes, include_constraints);
        let actual = normalize(&shuffled, include_indexes, include_constraints);
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn tables_and_schemas_are_sorted((ordered, _) in snapshot_and_shuffled()) {
        let catalog = normalize(&ordered, true, true);

        let mut schemas = catalog.schemas.clone();
        schemas.sort();
        schemas.dedup();
        prop_assert_eq!(&catalog.schemas, &schemas);

        let keys: Vec<(&str, &str)> = catalog
            .tables
            .iter()
            .map(|t| (t.schema.as_str(), t.name.as_str()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
        prop_assert_eq!(catalog.tables.len(), ordered.tables.len());
    }

    #[test]
    fn key_columns_follow_ordinal_positions((_, shuffled) in snapshot_and_shuffled()) {
        let catalog = normalize(&shuffled, true, true);

        for table in &catalog.tables {
            let column_names: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
            let expected: Vec<String> = (0..table.columns.len()).map(|c| format!("c{}", c)).collect();
            prop_assert_eq!(column_names, expected);

            if let Some(pk) = &table.primary_key {
                let expected: Vec<String> = (0..pk.columns.len()).map(|c| format!("c{}", c)).collect();
                prop_assert_eq!(&pk.columns, &expected);
            }

            for index in &table.indexes {
                let expected: Vec<String> = (0..index.columns.len()).map(|c| format!("c{}", c)).collect();
                prop_assert_eq!(&index.columns, &expected);
            }
        }
    }

    #[test]
    fn foreign_key_columns_stay_paired((_, shuffled) in snapshot_and_shuffled()) {
        let catalog = normalize(&shuffled, false, true);

        for table in &catalog.tables {
            for fk in &table.foreign_keys {
                prop_assert_eq!(&fk.columns, &vec!["c1".to_string(), "c0".to_string()]);
                prop_assert_eq!(
                    &fk.referenced_columns,
                    &vec!["k_b".to_string(), "k_a".to_string()]
                );
                prop_assert_eq!(fk.referenced_table.as_str(), "t0");
            }
        }
    }

    #[test]
    fn column_flags_match_key_collections(
        (ordered, _) in snapshot_and_shuffled(),
        include_constraints in any::<bool>(),
    ) {
        let catalog = normalize(&ordered, false, include_constraints);
        assert_flags_consistent(&catalog);
    }

    #[test]
    fn orphan_rows_leave_no_trace((ordered, _) in snapshot_and_shuffled()) {
        let expected = normalize(&ordered, true, true);

        let mut polluted = ordered.clone();
        polluted.columns.push(RawColumn {
            schema: "public".to_string(),
            table_name: "ghost".to_string(),
            column_name: "id".to_string(),
            data_type: "integer".to_string(),
            is_nullable: false,
            column_default: None,
            ordinal_position: 1,
        });
        polluted.primary_keys.push(RawPrimaryKey {
            schema: "public".to_string(),
            table_name: "ghost".to_string(),
            constraint_name: "ghost_pkey".to_string(),
            column_name: "id".to_string(),
            ordinal_position: 1,
        });
        polluted.indexes.push(RawIndex {
            schema: "ghost_schema".to_string(),
            table_name: "t0".to_string(),
            index_name: "idx_ghost".to_string(),
            column_name: "c0".to_string(),
            ordinal_position: None,
            is_unique: true,
            index_type: "hash".to_string(),
        });

        prop_assert_eq!(normalize(&polluted, true, true), expected);
    }

    #[test]
    fn json_output_reproduces_the_model(
        (_, shuffled) in snapshot_and_shuffled(),
        include_indexes in any::<bool>(),
        include_constraints in any::<bool>(),
    ) {
        let catalog = normalize(&shuffled, include_indexes, include_constraints);
        let json = render_json(&catalog).unwrap();
        prop_assert_eq!(parse_json(&json).unwrap(), catalog);
    }
}

fn users_orders_snapshot() -> CatalogSnapshot {
    let column = |table: &str, name: &str, data_type: &str, nullable: bool, position: i32| {
        RawColumn {
            schema: "public".to_string(),
            table_name: table.to_string(),
            column_name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: nullable,
            column_default: None,
            ordinal_position: position,
        }
    };
    let pk = |table: &str| RawPrimaryKey {
        schema: "public".to_string(),
        table_name: table.to_string(),
        constraint_name: format!("{}_pkey", table),
        column_name: "id".to_string(),
        ordinal_position: 1,
    };

    CatalogSnapshot {
        tables: vec![
            RawTable {
                schema: "public".to_string(),
                name: "users".to_string(),
                kind: TableKind::Table,
            },
            RawTable {
                schema: "public".to_string(),
                name: "orders".to_string(),
                kind: TableKind::Table,
            },
        ],
        columns: vec![
            column("users", "id", "integer", false, 1),
            column("users", "email", "character varying", false, 2),
            column("users", "created_at", "timestamp without time zone", true, 3),
            column("orders", "id", "integer", false, 1),
            column("orders", "user_id", "integer", false, 2),
            column("orders", "total", "numeric", true, 3),
        ],
        primary_keys: vec![pk("users"), pk("orders")],
        unique_constraints: vec![RawUniqueConstraint {
            schema: "public".to_string(),
            table_name: "users".to_string(),
            constraint_name: "users_email_key".to_string(),
            column_name: "email".to_string(),
            ordinal_position: 1,
        }],
        foreign_keys: vec![RawForeignKey {
            schema: "public".to_string(),
            table_name: "orders".to_string(),
            constraint_name: "orders_user_id_fkey".to_string(),
            column_name: "user_id".to_string(),
            ordinal_position: 1,
            referenced_schema: "public".to_string(),
            referenced_table: "users".to_string(),
            referenced_column: "id".to_string(),
            on_update: Some("NO ACTION".to_string()),
            on_delete: Some("CASCADE".to_string()),
        }],
        indexes: Vec::new(),
    }
}

#[test]
fn users_orders_scenario() {
    let catalog = normalize(&users_orders_snapshot(), false, true);

    let users = catalog.table("public", "users").expect("users");
    assert!(users.column("id").is_some_and(|c| c.is_primary_key));
    assert!(users.column("email").is_some_and(|c| c.is_unique && !c.is_nullable));

    let orders = catalog.table("public", "orders").expect("orders");
    assert_eq!(orders.foreign_keys.len(), 1);
    assert_eq!(orders.foreign_keys[0].on_delete.as_deref(), Some("CASCADE"));

    let options = RenderOptions {
        include_constraints: true,
        ..RenderOptions::default()
    };

    let markdown = render(OutputFormat::Markdown, &catalog, &options).expect("markdown");
    assert!(markdown.contains("**Foreign Keys:**"));
    assert!(markdown.contains("ON DELETE CASCADE"));
    assert!(!markdown.contains("ON UPDATE"));

    let mermaid = render(OutputFormat::Mermaid, &catalog, &options).expect("mermaid");
    let edges = mermaid
        .lines()
        .filter(|line| line.trim_start().starts_with("orders }o--|| users"))
        .count();
    assert_eq!(edges, 1);

    let json = render(OutputFormat::Json, &catalog, &options).expect("json");
    let parsed = pgschemaview_core::render::json::parse_json(&json).expect("parse");
    assert_eq!(parsed, catalog);
}

#[test]
fn empty_view_scenario() {
    let snapshot = CatalogSnapshot {
        tables: vec![RawTable {
            schema: "public".to_string(),
            name: "pending_jobs".to_string(),
            kind: TableKind::View,
        }],
        ..CatalogSnapshot::default()
    };

    let catalog = normalize(&snapshot, true, true);
    assert_eq!(catalog.tables.len(), 1);
    assert!(catalog.tables[0].columns.is_empty());

    let options = RenderOptions::default();
    let console = render(OutputFormat::Console, &catalog, &options).expect("console");
    assert!(console.contains("pending_jobs"));
    assert!(console.contains("(no columns)"));

    let markdown = render(OutputFormat::Markdown, &catalog, &options).expect("markdown");
    assert!(markdown.contains("### Table: pending_jobs (VIEW)"));
    assert!(markdown.contains("*(no columns)*"));
}
