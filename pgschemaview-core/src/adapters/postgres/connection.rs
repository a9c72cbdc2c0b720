//! PostgreSQL connection validation and pool setup.

use super::PostgresCatalog;
use crate::{Result, error::SchemaViewError};
use std::time::Duration;
use url::Url;

/// Six catalog queries run concurrently, one connection each
const MAX_CONNECTIONS: u32 = 6;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const STATEMENT_TIMEOUT_SECS: u64 = 30;

impl PostgresCatalog {
    /// Connects to PostgreSQL and verifies the server is reachable.
    ///
    /// Each pooled session is configured read-only with a statement timeout
    /// and an application name.
    ///
    /// # Errors
    /// Returns a configuration error for a malformed connection string and a
    /// connection error (with the URL redacted) if the server cannot be
    /// reached or rejects the login.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        use sqlx::Executor;

        validate_connection_string(connection_string)?;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute(
                        format!("SET statement_timeout = '{}s'", STATEMENT_TIMEOUT_SECS).as_str(),
                    )
                    .await?;

                    let app_name = format!("pg-schema-view-{}", env!("CARGO_PKG_VERSION"));
                    conn.execute(format!("SET application_name = '{}'", app_name).as_str())
                        .await?;

                    conn.execute("SET default_transaction_read_only = on")
                        .await?;

                    Ok(())
                })
            })
            .connect(connection_string)
            .await
            .map_err(|e| SchemaViewError::connection_failed(connection_string, e))?;

        tracing::debug!(
            "Connected to {} (pool size {})",
            crate::error::redact_database_url(connection_string),
            pool.size()
        );

        Ok(Self { pool })
    }
}

/// Validates the connection string format before any network activity
///
/// # Errors
/// Returns a configuration error if the string is not a `postgres://` or
/// `postgresql://` URL with a host, either in the authority or as a `host`
/// query parameter.
pub fn validate_connection_string(connection_string: &str) -> Result<()> {
    let url = Url::parse(connection_string).map_err(|e| {
        SchemaViewError::configuration(format!(
            "Invalid PostgreSQL connection string format: {}",
            e
        ))
    })?;

    if !matches!(url.scheme(), "postgres" | "postgresql") {
        return Err(SchemaViewError::configuration(
            "Connection string must use postgres:// or postgresql:// scheme",
        ));
    }

    // Unix socket connections carry the socket directory as `?host=`
    let socket_host = url
        .query_pairs()
        .any(|(key, value)| key == "host" && !value.is_empty());

    if url.host_str().is_none_or(str::is_empty) && !socket_host {
        return Err(SchemaViewError::configuration(
            "Connection string must specify a host",
        ));
    }

    Ok(())
}
