//! System-catalog queries.
//!
//! Every query takes the schema list as `$1::text[]` and returns one row per
//! relation, column, key column or index column. Identifier and domain types
//! from `information_schema` are cast to plain `text`/`int4` so they decode
//! into `String`/`i32`.

use crate::adapters::helpers::RowExt;
use crate::catalog::{
    CatalogSnapshot, RawColumn, RawForeignKey, RawIndex, RawPrimaryKey, RawTable,
    RawUniqueConstraint, TableKind,
};
use crate::{Result, error::SchemaViewError};
use sqlx::PgPool;
use sqlx::postgres::PgRow;

/// Ordinary tables, views and materialized views not owned by an extension
const TABLES_QUERY: &str = r#"
    SELECT
        n.nspname::text AS schema,
        c.relname::text AS name,
        CASE c.relkind
            WHEN 'v' THEN 'view'
            WHEN 'm' THEN 'materialized_view'
            ELSE 'table'
        END AS kind
    FROM pg_class c
    JOIN pg_namespace n ON n.oid = c.relnamespace
    WHERE n.nspname = ANY($1::text[])
      AND c.relkind IN ('r', 'p', 'v', 'm')
      AND NOT EXISTS (
          SELECT 1 FROM pg_depend d
          WHERE d.objid = c.oid AND d.deptype = 'e'
      )
    ORDER BY n.nspname, c.relname
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT
        table_schema::text AS schema,
        table_name::text AS table_name,
        column_name::text AS column_name,
        data_type::text AS data_type,
        (is_nullable = 'YES') AS is_nullable,
        column_default::text AS column_default,
        ordinal_position::int4 AS ordinal_position
    FROM information_schema.columns
    WHERE table_schema = ANY($1::text[])
    ORDER BY table_schema, table_name, ordinal_position
"#;

/// Primary-key (`contype = 'p'`) or unique (`contype = 'u'`) key columns,
/// positioned by their place in the constraint
const KEY_COLUMNS_QUERY: &str = r#"
    SELECT
        n.nspname::text AS schema,
        t.relname::text AS table_name,
        con.conname::text AS constraint_name,
        a.attname::text AS column_name,
        k.ord::int4 AS ordinal_position
    FROM pg_constraint con
    JOIN pg_class t ON t.oid = con.conrelid
    JOIN pg_namespace n ON n.oid = t.relnamespace
    CROSS JOIN LATERAL unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
    JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
    WHERE con.contype::text = $2
      AND n.nspname = ANY($1::text[])
    ORDER BY n.nspname, t.relname, con.conname, k.ord
"#;

/// Foreign-key column pairs. `conkey` and `confkey` are unnested together so
/// each local column stays paired with the column it references.
const FOREIGN_KEYS_QUERY: &str = r#"
    SELECT
        n.nspname::text AS schema,
        t.relname::text AS table_name,
        con.conname::text AS constraint_name,
        a.attname::text AS column_name,
        k.ord::int4 AS ordinal_position,
        rn.nspname::text AS referenced_schema,
        rt.relname::text AS referenced_table,
        ra.attname::text AS referenced_column,
        CASE con.confupdtype
            WHEN 'a' THEN 'NO ACTION'
            WHEN 'r' THEN 'RESTRICT'
            WHEN 'c' THEN 'CASCADE'
            WHEN 'n' THEN 'SET NULL'
            WHEN 'd' THEN 'SET DEFAULT'
        END AS on_update,
        CASE con.confdeltype
            WHEN 'a' THEN 'NO ACTION'
            WHEN 'r' THEN 'RESTRICT'
            WHEN 'c' THEN 'CASCADE'
            WHEN 'n' THEN 'SET NULL'
            WHEN 'd' THEN 'SET DEFAULT'
        END AS on_delete
    FROM pg_constraint con
    JOIN pg_class t ON t.oid = con.conrelid
    JOIN pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_class rt ON rt.oid = con.confrelid
    JOIN pg_namespace rn ON rn.oid = rt.relnamespace
    CROSS JOIN LATERAL unnest(con.conkey, con.confkey) WITH ORDINALITY AS k(attnum, ref_attnum, ord)
    JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
    JOIN pg_attribute ra ON ra.attrelid = con.confrelid AND ra.attnum = k.ref_attnum
    WHERE con.contype = 'f'
      AND n.nspname = ANY($1::text[])
    ORDER BY n.nspname, t.relname, con.conname, k.ord
"#;

/// Plain indexes; indexes backing a constraint are already reported as keys
const INDEXES_QUERY: &str = r#"
    SELECT
        n.nspname::text AS schema,
        t.relname::text AS table_name,
        i.relname::text AS index_name,
        a.attname::text AS column_name,
        idx.indisunique AS is_unique,
        am.amname::text AS index_type,
        array_position(idx.indkey::int2[], a.attnum)::int4 AS ordinal_position
    FROM pg_class t
    JOIN pg_index idx ON t.oid = idx.indrelid
    JOIN pg_class i ON i.oid = idx.indexrelid
    JOIN pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_am am ON am.oid = i.relam
    JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(idx.indkey)
    WHERE n.nspname = ANY($1::text[])
      AND t.relkind IN ('r', 'p', 'm')
      AND NOT EXISTS (
          SELECT 1 FROM pg_constraint c
          WHERE c.conindid = i.oid
      )
      AND a.attnum > 0
      AND NOT a.attisdropped
    ORDER BY n.nspname, t.relname, i.relname, ordinal_position
"#;

/// Runs all six catalog queries concurrently.
///
/// Fails as a whole if any query fails.
pub(super) async fn introspect(pool: &PgPool, schemas: &[String]) -> Result<CatalogSnapshot> {
    let start_time = std::time::Instant::now();
    tracing::debug!("Introspecting schemas: {}", schemas.join(", "));

    let (tables, columns, primary_keys, unique_constraints, foreign_keys, indexes) = futures::try_join!(
        fetch_tables(pool, schemas),
        fetch_columns(pool, schemas),
        fetch_primary_keys(pool, schemas),
        fetch_unique_constraints(pool, schemas),
        fetch_foreign_keys(pool, schemas),
        fetch_indexes(pool, schemas),
    )?;

    tracing::debug!(
        "Introspection completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    tracing::debug!("Found {} tables, {} columns", tables.len(), columns.len());

    Ok(CatalogSnapshot {
        tables,
        columns,
        primary_keys,
        unique_constraints,
        foreign_keys,
        indexes,
    })
}

async fn fetch_rows(
    pool: &PgPool,
    sql: &'static str,
    schemas: &[String],
    query_name: &str,
) -> Result<Vec<PgRow>> {
    sqlx::query(sql)
        .bind(schemas)
        .fetch_all(pool)
        .await
        .map_err(|e| SchemaViewError::introspection_failed(format!("{} query failed", query_name), e))
}

async fn fetch_key_rows(
    pool: &PgPool,
    schemas: &[String],
    contype: &str,
    query_name: &str,
) -> Result<Vec<PgRow>> {
    sqlx::query(KEY_COLUMNS_QUERY)
        .bind(schemas)
        .bind(contype)
        .fetch_all(pool)
        .await
        .map_err(|e| SchemaViewError::introspection_failed(format!("{} query failed", query_name), e))
}

async fn fetch_tables(pool: &PgPool, schemas: &[String]) -> Result<Vec<RawTable>> {
    let rows = fetch_rows(pool, TABLES_QUERY, schemas, "tables").await?;
    rows.iter()
        .map(|row| {
            let kind: String = row.get_field("kind", "tables")?;
            Ok(RawTable {
                schema: row.get_field("schema", "tables")?,
                name: row.get_field("name", "tables")?,
                kind: TableKind::from_catalog(&kind),
            })
        })
        .collect()
}

async fn fetch_columns(pool: &PgPool, schemas: &[String]) -> Result<Vec<RawColumn>> {
    let rows = fetch_rows(pool, COLUMNS_QUERY, schemas, "columns").await?;
    rows.iter()
        .map(|row| {
            Ok(RawColumn {
                schema: row.get_field("schema", "columns")?,
                table_name: row.get_field("table_name", "columns")?,
                column_name: row.get_field("column_name", "columns")?,
                data_type: row.get_field("data_type", "columns")?,
                is_nullable: row.get_field("is_nullable", "columns")?,
                column_default: row.get_field("column_default", "columns")?,
                ordinal_position: row.get_field("ordinal_position", "columns")?,
            })
        })
        .collect()
}

async fn fetch_primary_keys(pool: &PgPool, schemas: &[String]) -> Result<Vec<RawPrimaryKey>> {
    let rows = fetch_key_rows(pool, schemas, "p", "primary keys").await?;
    rows.iter()
        .map(|row| {
            Ok(RawPrimaryKey {
                schema: row.get_field("schema", "primary keys")?,
                table_name: row.get_field("table_name", "primary keys")?,
                constraint_name: row.get_field("constraint_name", "primary keys")?,
                column_name: row.get_field("column_name", "primary keys")?,
                ordinal_position: row.get_field("ordinal_position", "primary keys")?,
            })
        })
        .collect()
}

async fn fetch_unique_constraints(
    pool: &PgPool,
    schemas: &[String],
) -> Result<Vec<RawUniqueConstraint>> {
    let rows = fetch_key_rows(pool, schemas, "u", "unique constraints").await?;
    rows.iter()
        .map(|row| {
            Ok(RawUniqueConstraint {
                schema: row.get_field("schema", "unique constraints")?,
                table_name: row.get_field("table_name", "unique constraints")?,
                constraint_name: row.get_field("constraint_name", "unique constraints")?,
                column_name: row.get_field("column_name", "unique constraints")?,
                ordinal_position: row.get_field("ordinal_position", "unique constraints")?,
            })
        })
        .collect()
}

async fn fetch_foreign_keys(pool: &PgPool, schemas: &[String]) -> Result<Vec<RawForeignKey>> {
    let rows = fetch_rows(pool, FOREIGN_KEYS_QUERY, schemas, "foreign keys").await?;
    rows.iter()
        .map(|row| {
            Ok(RawForeignKey {
                schema: row.get_field("schema", "foreign keys")?,
                table_name: row.get_field("table_name", "foreign keys")?,
                constraint_name: row.get_field("constraint_name", "foreign keys")?,
                column_name: row.get_field("column_name", "foreign keys")?,
                ordinal_position: row.get_field("ordinal_position", "foreign keys")?,
                referenced_schema: row.get_field("referenced_schema", "foreign keys")?,
                referenced_table: row.get_field("referenced_table", "foreign keys")?,
                referenced_column: row.get_field("referenced_column", "foreign keys")?,
                on_update: row.get_field("on_update", "foreign keys")?,
                on_delete: row.get_field("on_delete", "foreign keys")?,
            })
        })
        .collect()
}

async fn fetch_indexes(pool: &PgPool, schemas: &[String]) -> Result<Vec<RawIndex>> {
    let rows = fetch_rows(pool, INDEXES_QUERY, schemas, "indexes").await?;
    rows.iter()
        .map(|row| {
            Ok(RawIndex {
                schema: row.get_field("schema", "indexes")?,
                table_name: row.get_field("table_name", "indexes")?,
                index_name: row.get_field("index_name", "indexes")?,
                column_name: row.get_field("column_name", "indexes")?,
                ordinal_position: row.get_field("ordinal_position", "indexes")?,
                is_unique: row.get_field("is_unique", "indexes")?,
                index_type: row.get_field("index_type", "indexes")?,
            })
        })
        .collect()
}
