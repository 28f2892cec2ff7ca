//! Gigcast — Entry Point
//!
//! Loads configuration, initializes the forecast engine, and serves the
//! HTTP API. Handles graceful shutdown on SIGINT/SIGTERM.

use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use gigcast::config::Config;
use gigcast::engine::EstimateEngine;
use gigcast::{logging, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if missing)
    let _ = dotenvy::dotenv();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    logging::init_logging(&config.logging)?;

    let caps = config.providers.capabilities();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        live_weather = caps.weather,
        live_events = caps.events,
        live_traffic = caps.traffic,
        "gigcast starting"
    );

    let web_config = config.web.clone();
    let engine = Arc::new(EstimateEngine::new(config));

    // Spawn web API (if enabled)
    let _web_handle = if web_config.enabled {
        let engine = engine.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = web::serve(web_config, engine).await {
                error!(error = %e, "web server error");
            }
        }))
    } else {
        None
    };

    info!("engine ready, waiting for shutdown signal");

    // Wait for shutdown signal
    let shutdown = async {
        let ctrl_c = signal::ctrl_c();
        #[cfg(unix)]
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => { info!("received SIGINT"); }
            _ = sigterm.recv() => { info!("received SIGTERM"); }
        }
    };

    shutdown.await;

    info!("shutdown complete");
    Ok(())
}
