//! SQLite connection pool and migration runner for Folio.
//!
//! - [`Database`] wraps a `SqlitePool`; handlers check out one connection per
//!   request and hand it to a repository explicitly.
//! - [`Database::migrate`] applies module migrations once each, tracked in
//!   the `_migrations` table.

mod error;
mod migrate;
mod pool;

pub use error::DbError;
pub use pool::Database;
pub use sqlx::pool::PoolConnection;
pub use sqlx::{Sqlite, SqliteConnection};
