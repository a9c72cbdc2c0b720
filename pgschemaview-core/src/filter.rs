//! Table include/exclude filtering applied after normalization.

use crate::models::{SchemaCatalog, Table};
use std::collections::HashSet;

/// Selects which tables of a normalized catalog are shown.
///
/// Exclusion is checked first and matches bare table names
/// case-insensitively. Inclusion, when present, matches either the bare name
/// or `schema.name` exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    include: Option<HashSet<String>>,
    exclude: HashSet<String>,
}

impl TableFilter {
    /// Creates a filter. An empty include list is treated as "no include list".
    pub fn new(include: Option<Vec<String>>, exclude: Vec<String>) -> Self {
        let include = include
            .filter(|tables| !tables.is_empty())
            .map(|tables| tables.into_iter().collect());
        let exclude = exclude
            .into_iter()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        Self { include, exclude }
    }

    /// True when the filter would keep every table
    pub fn is_noop(&self) -> bool {
        self.include.is_none() && self.exclude.is_empty()
    }

    /// Whether a single table survives the filter
    pub fn matches(&self, table: &Table) -> bool {
        if self.exclude.contains(&table.name.to_lowercase()) {
            return false;
        }

        match &self.include {
            Some(include) => {
                include.contains(&table.name) || include.contains(&table.qualified_name())
            }
            None => true,
        }
    }

    /// Drops non-matching tables, preserving order. The schema list is kept
    /// as-is; renderers skip schemas without tables.
    pub fn apply(&self, mut catalog: SchemaCatalog) -> SchemaCatalog {
        if self.is_noop() {
            return catalog;
        }

        let before = catalog.tables.len();
        catalog.tables.retain(|table| self.matches(table));
        tracing::debug!(
            "Table filter kept {} of {} tables",
            catalog.tables.len(),
            before
        );
        catalog
    }
}
