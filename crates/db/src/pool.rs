use std::str::FromStr;
use std::time::Duration;

use folio_kernel::settings::DatabaseSettings;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;

use crate::error::DbError;

/// Shared handle to the SQLite pool.
///
/// Cloning is cheap; every clone refers to the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool against the configured database, creating the file if needed.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(&settings.url)
            .map_err(|source| DbError::InvalidUrl {
                url: settings.url.clone(),
                source,
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
            .connect_with(options)
            .await
            .map_err(DbError::Connect)?;

        tracing::info!(
            target: "folio-db",
            url = %settings.url,
            max_connections = settings.max_connections,
            "database pool ready"
        );

        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool
    /// holds exactly one connection and never recycles it.
    pub async fn connect_in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|source| DbError::InvalidUrl {
                url: "sqlite::memory:".to_string(),
                source,
            })?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(DbError::Connect)?;

        Ok(Self { pool })
    }

    /// Check out a connection; it returns to the pool when dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, DbError> {
        self.pool.acquire().await.map_err(DbError::Acquire)
    }

    /// Close every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
