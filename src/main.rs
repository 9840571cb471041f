//! Split Router - Entry Point
//!
//! Initializes configuration, logging and metrics, then serves the
//! optimal-split API until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (defaults when absent) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create Prometheus registry and spawn /metrics server
//! 4. Create SplitRouter use case with fallback venues
//! 5. Spawn API server (/api/optimal-split, /health, /live, /ready)
//! 6. Wait for SIGINT → readiness 503 → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use split_router::adapters::api::{ApiServer, AppState};
use split_router::adapters::metrics::{HealthState, MetricsRegistry};
use split_router::config;
use split_router::usecases::SplitRouter;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_or_default(CONFIG_PATH)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.service.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        api = %config.server.bind_address,
        jitter_seed = ?config.synth.jitter_seed,
        "Starting split router"
    );

    // ── 3. Shutdown signal channel ──────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = HealthState::new();

    // ── 4. Metrics registry + /metrics server ───────────────
    let metrics = if config.metrics.enabled {
        let registry = Arc::new(
            MetricsRegistry::new().context("Failed to create metrics registry")?,
        );
        let metrics_shutdown = shutdown_tx.subscribe();
        let bind = config.metrics.bind_address.clone();
        let serving = Arc::clone(&registry);
        tokio::spawn(async move {
            if let Err(e) = serving.serve(bind, metrics_shutdown).await {
                error!(error = %e, "Metrics server failed");
            }
        });
        Some(registry)
    } else {
        warn!("Metrics disabled");
        None
    };

    // ── 5. Routing use case + API server ────────────────────
    let router = Arc::new(SplitRouter::new(
        config.fallback.clone(),
        config.synth.clone(),
    ));
    let state = AppState::new(router, metrics, health.clone());
    let api = ApiServer::new(state, config.server.bind_address.clone());
    let api_shutdown = shutdown_tx.subscribe();
    let api_handle = tokio::spawn(async move {
        if let Err(e) = api.run(api_shutdown).await {
            error!(error = %e, "API server failed");
        }
    });

    info!("All tasks spawned - router is serving");

    // ── 6. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    health.begin_shutdown();
    let _ = shutdown_tx.send(());

    let _ = tokio::time::timeout(Duration::from_secs(10), api_handle).await;

    info!("Shutdown complete");
    Ok(())
}
