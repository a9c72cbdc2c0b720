//! PostgreSQL catalog source backed by a read-only `sqlx` pool.
//!
//! # Module Structure
//! - `connection`: connection string validation and pool setup
//! - `queries`: the six system-catalog queries and their row decoding
//!
//! # Security Guarantees
//! - Every pooled session runs with `default_transaction_read_only = on`
//! - Schema names are bound as a `text[]` parameter, never interpolated
//! - Connection strings are redacted in errors and logs

mod connection;
mod queries;

use super::CatalogSource;
use crate::{Result, catalog::CatalogSnapshot};
use async_trait::async_trait;
use sqlx::PgPool;

pub use connection::validate_connection_string;

/// Reads raw catalog rows from a live PostgreSQL database
pub struct PostgresCatalog {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCatalog")
            .field("pool_size", &self.pool.size())
            .field("pool_idle", &self.pool.num_idle())
            .finish()
    }
}

impl PostgresCatalog {
    /// The underlying read-only pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Closes the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CatalogSource for PostgresCatalog {
    async fn introspect(&self, schemas: &[String]) -> Result<CatalogSnapshot> {
        queries::introspect(&self.pool, schemas).await
    }
}
