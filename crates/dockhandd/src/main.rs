//! Dockhand daemon
//!
//! Connects to a configured Docker host over SSH, keeps metric history
//! collected on a fixed cadence, and sweeps idle sessions until shut down.

use anyhow::{Context, Result};
use dockhand_lib::{AppContext, ConnectionProfile};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting dockhandd");

    let config = config::DaemonConfig::load()?;
    info!(host = %config.host, port = config.port, username = %config.username, "Daemon configured");

    let ctx = Arc::new(AppContext::new(config.orchestrator.clone()));

    let profile = ConnectionProfile::new(&config.host, config.port, &config.username);
    let session = ctx
        .registry
        .connect(profile, &config.password)
        .await
        .with_context(|| format!("failed to connect to {}:{}", config.host, config.port))?;
    info!(session_id = %session.id, "Connected");

    let status = ctx.docker.status(&session.id).await;
    info!(status = %status, "Docker daemon probed");

    ctx.poller.start(&session.id).await;

    // Idle-session sweep. The registry never schedules its own cleanup.
    let sweeper = {
        let ctx = Arc::clone(&ctx);
        let period = std::time::Duration::from_secs(config.cleanup_interval_secs);
        let max_idle = config.orchestrator.idle_timeout();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = ctx.registry.cleanup_idle(max_idle);
                if removed > 0 {
                    warn!(removed, "Idle sessions closed");
                }
            }
        })
    };

    tokio::signal::ctrl_c().await?;
    info!("SIGINT received, shutting down");

    sweeper.abort();
    ctx.shutdown().await;
    Ok(())
}
