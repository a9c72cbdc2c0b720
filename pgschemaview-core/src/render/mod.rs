//! Output renderers for the normalized schema model.
//!
//! Each renderer is a pure function from a [`SchemaCatalog`] and
//! [`RenderOptions`] to a string. Renderers walk schemas and tables in catalog
//! order and never re-sort or mutate the model.
//!
//! # Module Structure
//! - `console`: terminal listing with optional ANSI styling
//! - `markdown`: Markdown document with one column table per relation
//! - `json`: lossless serialization of the model
//! - `mermaid`: `erDiagram` entity/relationship notation

pub mod console;
pub mod json;
pub mod markdown;
pub mod mermaid;

use crate::models::{SchemaCatalog, Table};
use crate::{Result, SchemaViewError};
use serde::{Deserialize, Serialize};

/// Output format selector. The set of renderers is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable terminal listing
    #[default]
    Console,
    /// Markdown documentation
    Markdown,
    /// JSON structured output
    Json,
    /// Mermaid ER diagram
    Mermaid,
}

impl OutputFormat {
    /// All supported formats, in help-text order
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Console,
        OutputFormat::Markdown,
        OutputFormat::Json,
        OutputFormat::Mermaid,
    ];
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Console => write!(f, "console"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Mermaid => write!(f, "mermaid"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = SchemaViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "markdown" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "mermaid" => Ok(OutputFormat::Mermaid),
            _ => Err(SchemaViewError::unsupported_format(s)),
        }
    }
}

/// Display switches consumed by the renderers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show index sections (console, Markdown)
    pub include_indexes: bool,
    /// Show unique-constraint and foreign-key sections (console, Markdown)
    pub include_constraints: bool,
    /// Emit only table shells and edges (Mermaid)
    pub relationships_only: bool,
    /// ANSI styling (console)
    pub color: bool,
}

/// Renders the catalog in the selected format
pub fn render(
    format: OutputFormat,
    catalog: &SchemaCatalog,
    options: &RenderOptions,
) -> Result<String> {
    tracing::debug!("Rendering {} tables as {}", catalog.tables.len(), format);

    match format {
        OutputFormat::Console => Ok(console::render_console(catalog, options)),
        OutputFormat::Markdown => Ok(markdown::render_markdown(catalog, options)),
        OutputFormat::Json => json::render_json(catalog),
        OutputFormat::Mermaid => Ok(mermaid::render_mermaid(catalog, options.relationships_only)),
    }
}

/// Schemas in catalog order paired with their tables, skipping schemas that
/// have no tables left.
pub(crate) fn schema_sections(catalog: &SchemaCatalog) -> Vec<(&str, Vec<&Table>)> {
    catalog
        .schemas
        .iter()
        .map(|schema| {
            (
                schema.as_str(),
                catalog.tables_in(schema).collect::<Vec<_>>(),
            )
        })
        .filter(|(_, tables)| !tables.is_empty())
        .collect()
}
