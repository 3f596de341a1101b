//! Folio application library
//!
//! Wires the book records module into the Folio kernel and exposes the
//! bootstrap steps shared by the `folio-app` binary and the `folio` CLI.

pub mod modules;
pub mod utils;

use anyhow::Context;
use folio_db::Database;
use folio_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::*;

/// Build a registry holding every application module bound to `db`.
pub fn registry(db: &Database) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db);
    registry
}

/// Apply pending module migrations to `db`.
pub async fn apply_migrations(db: &Database, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = db
        .migrate(&migrations)
        .await
        .context("failed to apply migrations")?;

    tracing::info!(
        applied,
        known = migrations.len(),
        "database schema is up to date"
    );
    Ok(applied)
}

/// Connect to the configured database and bring its schema up to date.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let db = Database::connect(&settings.database)
        .await
        .context("failed to open database")?;
    let applied = apply_migrations(&db, &registry(&db)).await;
    db.close().await;
    applied
}

/// Run the HTTP service until a shutdown signal arrives.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "folio bootstrap starting"
    );

    let db = Database::connect(&settings.database)
        .await
        .context("failed to open database")?;
    let registry = registry(&db);
    apply_migrations(&db, &registry).await?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = folio_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    db.close().await;

    tracing::info!("folio shut down");
    served
}
