use thiserror::Error;

/// Errors raised while managing the pool or applying migrations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid database url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to connect to database")]
    Connect(#[source] sqlx::Error),

    #[error("failed to get connection from pool")]
    Acquire(#[source] sqlx::Error),

    #[error("migration {module}/{id} failed")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to prepare migration bookkeeping")]
    Bookkeeping(#[source] sqlx::Error),
}
