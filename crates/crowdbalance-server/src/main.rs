//! CrowdBalance Server — Application entry point.

use anyhow::Context;
use crowdbalance_db::DbManager;
use crowdbalance_server::{AppState, ServerConfig, Sweeper, build_router};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("crowdbalance=info".parse().unwrap()),
        )
        .json()
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(bind = %config.bind_addr, "Starting CrowdBalance server...");

    let db = DbManager::init(&config.db)
        .await
        .context("database initialization failed")?;

    let state = AppState::new(db.client().clone());

    let sweeper = Sweeper::new(state.locations.clone(), config.retention_horizon_secs);
    let sweeper_handle = sweeper.spawn(std::time::Duration::from_secs(config.sweep_interval_secs));
    tracing::info!(
        horizon_secs = config.retention_horizon_secs,
        interval_secs = config.sweep_interval_secs,
        "Retention sweeper started"
    );

    let app = build_router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .context("server error")?;

    sweeper_handle.shutdown().await;
    tracing::info!("CrowdBalance server stopped.");

    Ok(())
}
