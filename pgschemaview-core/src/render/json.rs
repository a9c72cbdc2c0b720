//! JSON rendering: the machine-readable form of the model.
//!
//! Field order and nesting follow the model definitions exactly, so
//! [`parse_json`] reconstructs an identical catalog.

use crate::models::SchemaCatalog;
use crate::{Result, SchemaViewError};

/// Serializes the catalog as pretty-printed JSON
pub fn render_json(catalog: &SchemaCatalog) -> Result<String> {
    serde_json::to_string_pretty(catalog)
        .map_err(|e| SchemaViewError::serialization("Failed to render schema as JSON", e))
}

/// Parses JSON produced by [`render_json`] back into a catalog
pub fn parse_json(json: &str) -> Result<SchemaCatalog> {
    serde_json::from_str(json)
        .map_err(|e| SchemaViewError::serialization("Failed to parse schema JSON", e))
}
