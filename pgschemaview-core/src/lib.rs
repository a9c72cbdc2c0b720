//! Core library for pg-schema-view.
//!
//! Reads the PostgreSQL system catalogs, folds the flat catalog rows into a
//! nested schema model and renders that model for people (terminal,
//! Markdown), programs (JSON) and diagrams (Mermaid).
//!
//! # Pipeline
//! 1. [`adapters::CatalogSource`] produces a [`catalog::CatalogSnapshot`]
//! 2. [`normalize()`] turns the snapshot into a [`SchemaCatalog`]
//! 3. [`TableFilter`] optionally narrows the tables
//! 4. [`render()`] produces the output text
//!
//! Everything after step 1 is pure and works without a database.
//!
//! # Security
//! - Database sessions are opened read-only
//! - Connection strings are redacted in logs, errors and `Debug` output

pub mod adapters;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod render;

// Re-export commonly used types
pub use adapters::CatalogSource;
#[cfg(feature = "postgresql")]
pub use adapters::postgres::PostgresCatalog;
pub use catalog::CatalogSnapshot;
pub use config::{Config, ConfigLayer, ConnectionEnv};
pub use error::{Result, SchemaViewError};
pub use filter::TableFilter;
pub use logging::init_logging;
pub use models::{
    Column, ForeignKey, Index, PrimaryKey, SchemaCatalog, Table, TableKind, UniqueConstraint,
};
pub use normalize::normalize;
pub use render::{OutputFormat, RenderOptions, render};
