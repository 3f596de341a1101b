use folio_kernel::Migration;
use sqlx::Connection;

use crate::error::DbError;
use crate::pool::Database;

const BOOKKEEPING_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

impl Database {
    /// Apply every migration that has not run against this database yet.
    ///
    /// Each migration runs in its own transaction together with its
    /// bookkeeping row. Returns the number of migrations applied.
    pub async fn migrate(&self, migrations: &[(String, Migration)]) -> Result<usize, DbError> {
        let mut conn = self.acquire().await?;

        sqlx::raw_sql(BOOKKEEPING_TABLE)
            .execute(&mut *conn)
            .await
            .map_err(DbError::Bookkeeping)?;

        let mut applied = 0;
        for (module, migration) in migrations {
            let failed = |source: sqlx::Error| DbError::Migration {
                module: module.clone(),
                id: migration.id.to_string(),
                source,
            };

            let already: Option<String> =
                sqlx::query_scalar("SELECT id FROM _migrations WHERE module = ? AND id = ?")
                    .bind(module.as_str())
                    .bind(migration.id)
                    .fetch_optional(&mut *conn)
                    .await
                    .map_err(failed)?;

            if already.is_some() {
                tracing::debug!(target: "folio-db", %module, id = migration.id, "migration already applied");
                continue;
            }

            let mut tx = conn.begin().await.map_err(failed)?;
            sqlx::raw_sql(migration.up)
                .execute(&mut *tx)
                .await
                .map_err(failed)?;
            sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
                .bind(module.as_str())
                .bind(migration.id)
                .execute(&mut *tx)
                .await
                .map_err(failed)?;
            tx.commit().await.map_err(failed)?;

            tracing::info!(target: "folio-db", %module, id = migration.id, "migration applied");
            applied += 1;
        }

        Ok(applied)
    }
}
