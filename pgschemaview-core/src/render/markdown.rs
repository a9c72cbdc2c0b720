//! Markdown document renderer.

use super::{RenderOptions, schema_sections};
use crate::models::{SchemaCatalog, Table, TableKind};

fn kind_label(kind: TableKind) -> &'static str {
    match kind {
        TableKind::Table => "",
        TableKind::View => " (VIEW)",
        TableKind::MaterializedView => " (MATERIALIZED VIEW)",
    }
}

/// Renders the catalog as a Markdown document
pub fn render_markdown(catalog: &SchemaCatalog, options: &RenderOptions) -> String {
    let mut lines: Vec<String> = vec!["# Database Schema".to_string(), String::new()];

    for (schema, tables) in schema_sections(catalog) {
        lines.push(format!("## Schema: {}", schema));
        lines.push(String::new());

        for table in tables {
            render_table(&mut lines, table, options);
        }
    }

    lines.join("\n")
}

fn render_table(lines: &mut Vec<String>, table: &Table, options: &RenderOptions) {
    lines.push(format!("### Table: {}{}", table.name, kind_label(table.kind)));
    lines.push(String::new());

    if table.columns.is_empty() {
        lines.push("*(no columns)*".to_string());
        lines.push(String::new());
        return;
    }

    lines.push("| Name | Type | Nullable | Default | Constraints |".to_string());
    lines.push("|------|------|----------|---------|-------------|".to_string());

    for column in &table.columns {
        let mut constraints = Vec::new();
        if column.is_primary_key {
            constraints.push("PK");
        }
        if column.is_unique && !column.is_primary_key {
            constraints.push("UNIQUE");
        }

        let nullable = if column.is_nullable { "Yes" } else { "**No**" };
        let default = column
            .default_value
            .as_deref()
            .filter(|d| !d.is_empty())
            .map_or_else(|| "-".to_string(), |d| format!("`{}`", d));
        let constraints = if constraints.is_empty() {
            "-".to_string()
        } else {
            constraints.join(", ")
        };

        lines.push(format!(
            "| {} | `{}` | {} | {} | {} |",
            column.name, column.data_type, nullable, default, constraints
        ));
    }
    lines.push(String::new());

    if let Some(primary_key) = &table.primary_key {
        lines.push(format!(
            "**Primary Key:** `{}` ({})",
            primary_key.name,
            primary_key.columns.join(", ")
        ));
        lines.push(String::new());
    }

    if options.include_constraints {
        let uniques: Vec<_> = table.multi_column_uniques().collect();
        if !uniques.is_empty() {
            lines.push("**Unique Constraints:**".to_string());
            for unique in uniques {
                lines.push(format!("- `{}`: ({})", unique.name, unique.columns.join(", ")));
            }
            lines.push(String::new());
        }

        if !table.foreign_keys.is_empty() {
            lines.push("**Foreign Keys:**".to_string());
            for fk in &table.foreign_keys {
                let actions = fk.display_actions();
                let actions = if actions.is_empty() {
                    String::new()
                } else {
                    format!(" {}", actions.join(" "))
                };
                lines.push(format!(
                    "- `{}`: ({}) → `{}`({}){}",
                    fk.name,
                    fk.columns.join(", "),
                    fk.display_target(&table.schema),
                    fk.referenced_columns.join(", "),
                    actions
                ));
            }
            lines.push(String::new());
        }
    }

    if options.include_indexes && !table.indexes.is_empty() {
        lines.push("**Indexes:**".to_string());
        for index in &table.indexes {
            let unique = if index.is_unique { " [UNIQUE]" } else { "" };
            lines.push(format!(
                "- `{}`: ({}){} [{}]",
                index.name,
                index.columns.join(", "),
                unique,
                index.index_type
            ));
        }
        lines.push(String::new());
    }
}
