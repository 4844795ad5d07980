//! The campsite favorites web server.

use std::sync::Arc;

use campsite_favorites::{api, config::Config, db, logging, AppState};
use tokio::net::TcpListener;

/// # Errors
///
/// See implementation.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    logging::init(&config.log_filter)?;

    tracing::info!("connecting to database and running migrations");

    let db_pool = db::initialize(&config.database_url).await?;

    let listener = TcpListener::bind(&config.address).await?;

    tracing::info!(address = %listener.local_addr()?, "listening");

    let router = api::router(AppState {
        db_pool,
        config: Arc::new(config),
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");

    Ok(())
}

/// Completes when the process receives Ctrl+C.
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("shutting down");
}
