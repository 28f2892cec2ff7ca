//! Axum HTTP server for the forecast API.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::config::WebConfig;
use crate::engine::EstimateEngine;

use super::routes;

/// Shared state for all web routes.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EstimateEngine>,
}

/// Start the HTTP server and serve until the process exits.
pub async fn serve(config: WebConfig, engine: Arc<EstimateEngine>) -> anyhow::Result<()> {
    let app = Router::new()
        .merge(routes::api_routes())
        .with_state(AppState { engine });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(port = config.port, "forecast api starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
