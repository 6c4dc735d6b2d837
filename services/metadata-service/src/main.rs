use fleet_core::{SystemClock, BUILD_INFO};
use metadata_service::{router, InMemoryFleet, ServiceConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Metadata Service {}", BUILD_INFO);

    let config = ServiceConfig::load()?;
    let health = config.health_evaluator();
    info!(
        "Agents are unresponsive after {}s without a heartbeat",
        health.threshold().num_seconds()
    );

    let fleet = InMemoryFleet::new();
    let server = Arc::new(fleet.server(Arc::new(SystemClock), health));
    let app = router(server);

    let listener = TcpListener::bind(config.bind_target()).await?;
    info!("Metadata Service listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Metadata Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
