//! HTTP server facade for Folio with Axum, error handling, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use folio_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod extract;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server and serve until ctrl-c
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let app = build_router(registry, settings);

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {}", address))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let mut router_builder = RouterBuilder::new().route("/health", get(health_check));

    for module in registry.modules() {
        let mount_path = module.mount_path();
        tracing::info!(
            module = module.name(),
            "mounting module routes under {}",
            mount_path
        );
        router_builder = router_builder.mount_module(&mount_path, module.routes());
    }

    router_builder
        .with_openapi(registry)
        .with_timeout(settings.server.request_timeout_ms)
        .with_cors()
        .with_tracing()
        .with_request_id()
        .build()
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
