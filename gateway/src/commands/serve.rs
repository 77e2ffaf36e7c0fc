//! Run the HTTP API

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::net::TcpListener;

use registry_gateway::api;
use registry_gateway::config::GatewayConfig;

pub async fn run(config: &GatewayConfig, bind: &str) -> Result<()> {
    let registry = Arc::new(config.connect()?);

    match registry.chain_height().await {
        Ok(slot) => tracing::info!(slot, rpc_url = %config.rpc_url, "ledger reachable"),
        Err(err) => tracing::warn!(error = %err, rpc_url = %config.rpc_url, "ledger not reachable yet"),
    }

    tracing::info!(
        program_id = %registry.program_id(),
        authority = %registry.authority(),
        commitment = ?config.commitment.commitment,
        "gateway configured"
    );

    let app = api::router(registry);
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    println!("{} {}", "Listening on".cyan(), listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
