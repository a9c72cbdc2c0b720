//! Terminal listing of schemas, tables and columns.

use super::{RenderOptions, schema_sections};
use crate::models::{SchemaCatalog, Table, TableKind};
use colored::{ColoredString, Colorize};

/// Applies ANSI styles only when color output is enabled
#[derive(Debug, Clone, Copy)]
struct Palette {
    color: bool,
}

impl Palette {
    fn paint(self, text: &str, style: fn(ColoredString) -> ColoredString) -> String {
        if self.color {
            style(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }
}

fn table_icon(kind: TableKind) -> &'static str {
    match kind {
        TableKind::Table => "📦",
        TableKind::View => "👁️",
        TableKind::MaterializedView => "📊",
    }
}

/// Renders the catalog as an indented terminal listing
pub fn render_console(catalog: &SchemaCatalog, options: &RenderOptions) -> String {
    let palette = Palette {
        color: options.color,
    };
    let mut lines: Vec<String> = Vec::new();

    for (schema, tables) in schema_sections(catalog) {
        lines.push(String::new());
        lines.push(palette.paint(&format!("Schema: {}", schema), |s| s.bold().cyan()));
        lines.push(String::new());

        for table in tables {
            render_table(&mut lines, table, options, palette);
        }
    }

    lines.join("\n")
}

fn render_table(lines: &mut Vec<String>, table: &Table, options: &RenderOptions, palette: Palette) {
    lines.push(palette.paint(
        &format!("{} {}", table_icon(table.kind), table.name),
        |s| s.bold(),
    ));

    if table.columns.is_empty() {
        lines.push(palette.paint("  (no columns)", |s| s.bright_black()));
        lines.push(String::new());
        return;
    }

    for column in &table.columns {
        let mut parts = vec![
            format!("  • {}", palette.paint(&column.name, |s| s.white())),
            palette.paint(&format!("({})", column.data_type), |s| s.bright_black()),
        ];

        if column.is_nullable {
            parts.push(palette.paint("NULL", |s| s.dimmed()));
        } else {
            parts.push(palette.paint("NOT NULL", |s| s.bright_yellow()));
        }
        if column.is_primary_key {
            parts.push(palette.paint("PK", |s| s.bright_green()));
        }
        if column.is_unique && !column.is_primary_key {
            parts.push(palette.paint("UNIQUE", |s| s.bright_cyan()));
        }
        if let Some(default) = column.default_value.as_deref().filter(|d| !d.is_empty()) {
            parts.push(palette.paint(&format!("DEFAULT {}", default), |s| s.dimmed()));
        }

        lines.push(parts.join(" "));
    }

    if options.include_indexes && !table.indexes.is_empty() {
        lines.push(String::new());
        lines.push(palette.paint("  Indexes:", |s| s.dimmed()));
        for index in &table.indexes {
            let mut parts = vec![
                format!("    {}", palette.paint(&index.name, |s| s.cyan())),
                format!("({})", index.columns.join(", ")),
            ];
            if index.is_unique {
                parts.push(palette.paint("[UNIQUE]", |s| s.bright_cyan()));
            }
            parts.push(palette.paint(&format!("[{}]", index.index_type), |s| s.dimmed()));
            lines.push(parts.join(" "));
        }
    }

    if options.include_constraints {
        for unique in table.multi_column_uniques() {
            lines.push(String::new());
            lines.push(format!(
                "  {} {}: ({})",
                palette.paint("UNIQUE", |s| s.dimmed()),
                palette.paint(&unique.name, |s| s.cyan()),
                unique.columns.join(", ")
            ));
        }

        if !table.foreign_keys.is_empty() {
            lines.push(String::new());
            lines.push(palette.paint("  Foreign Keys:", |s| s.dimmed()));
            for fk in &table.foreign_keys {
                let mut parts = vec![
                    format!(
                        "    {} {}:",
                        palette.paint("FK", |s| s.magenta()),
                        palette.paint(&fk.name, |s| s.cyan())
                    ),
                    format!("({})", fk.columns.join(", ")),
                    palette.paint("→", |s| s.white()),
                    palette.paint(
                        &format!(
                            "{}({})",
                            fk.display_target(&table.schema),
                            fk.referenced_columns.join(", ")
                        ),
                        |s| s.bold(),
                    ),
                ];

                let actions = fk.display_actions();
                if !actions.is_empty() {
                    parts.push(palette.paint(&actions.join(" "), |s| s.dimmed()));
                }

                lines.push(parts.join(" "));
            }
        }
    }

    lines.push(String::new());
}
