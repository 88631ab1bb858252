//! Application start-up: database, module lifecycle, and the HTTP server.

use anyhow::Context;
use axum::Router;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

use crate::modules;

/// Build the registry with every resource module bound to `pool`.
pub fn build_registry(pool: &SqlitePool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool);
    registry
}

/// Connect, migrate, and return the fully assembled router.
///
/// Used by the server and by end-to-end tests.
pub async fn build_app(settings: &Settings) -> anyhow::Result<(Router, SqlitePool)> {
    let pool = bookstore_db::connect(&settings.database).await?;
    let registry = build_registry(&pool);

    bookstore_db::run_migrations(&pool, &registry)
        .await
        .context("failed to run migrations")?;

    Ok((bookstore_http::build_router(&registry, settings), pool))
}

/// Apply pending migrations and report how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = bookstore_db::connect(&settings.database).await?;
    let registry = build_registry(&pool);

    let applied = bookstore_db::run_migrations(&pool, &registry)
        .await
        .context("failed to run migrations")?;
    pool.close().await;

    tracing::info!(applied, "migrations complete");
    Ok(applied)
}

/// Run the server until Ctrl-C.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let pool = bookstore_db::connect(&settings.database).await?;
    let registry = build_registry(&pool);

    if settings.database.run_migrations {
        bookstore_db::run_migrations(&pool, &registry)
            .await
            .context("failed to run migrations")?;
    }

    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookstore_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.stop_all().await?;
    pool.close().await;

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
