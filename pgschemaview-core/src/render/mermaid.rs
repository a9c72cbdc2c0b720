//! Mermaid `erDiagram` renderer.

use crate::models::{Column, SchemaCatalog};
use std::collections::HashSet;

/// Many rows of the referencing table point at one row of the target
const MANY_TO_ONE: &str = "}o--||";

/// Mermaid attribute types must be a single token
fn attribute_type(data_type: &str) -> String {
    data_type
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn attribute_line(column: &Column) -> String {
    let key = if column.is_primary_key {
        " PK"
    } else if column.is_unique {
        " UK"
    } else {
        ""
    };
    let nullable = if column.is_nullable { "" } else { " \"NOT NULL\"" };

    format!(
        "    {} {}{}{}",
        attribute_type(&column.data_type),
        column.name,
        key,
        nullable
    )
}

/// Entity identifier; `schema_table` once more than one schema is shown
fn entity_name(schema: &str, table: &str, qualify: bool) -> String {
    if qualify {
        format!("{}_{}", schema, table)
    } else {
        table.to_string()
    }
}

/// Edge label derived from the constraint name
fn relationship_label(constraint: &str) -> String {
    constraint
        .strip_prefix("fk_")
        .unwrap_or(constraint)
        .replace('_', " ")
}

/// Renders the catalog as a Mermaid ER diagram.
///
/// With `relationships_only` every entity is an empty block. Edges are
/// deduplicated per (source table, target table) pair; the first foreign key
/// in catalog order supplies the label. Entities are prefixed with their
/// schema when the catalog covers several schemas.
pub fn render_mermaid(catalog: &SchemaCatalog, relationships_only: bool) -> String {
    let mut lines: Vec<String> = vec!["erDiagram".to_string(), String::new()];
    let qualify = catalog.schemas.len() > 1;

    for table in &catalog.tables {
        lines.push(format!(
            "  {} {{",
            entity_name(&table.schema, &table.name, qualify)
        ));
        if !relationships_only {
            lines.extend(table.columns.iter().map(attribute_line));
        }
        lines.push("  }".to_string());
        lines.push(String::new());
    }

    let mut seen: HashSet<(&str, &str, &str, &str)> = HashSet::new();
    for table in &catalog.tables {
        for fk in &table.foreign_keys {
            let edge = (
                table.schema.as_str(),
                table.name.as_str(),
                fk.referenced_schema.as_str(),
                fk.referenced_table.as_str(),
            );
            if !seen.insert(edge) {
                continue;
            }

            lines.push(format!(
                "  {} {} {} : \"{}\"",
                entity_name(&table.schema, &table.name, qualify),
                MANY_TO_ONE,
                entity_name(&fk.referenced_schema, &fk.referenced_table, qualify),
                relationship_label(&fk.name)
            ));
        }
    }

    lines.join("\n")
}
