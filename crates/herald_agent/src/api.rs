//! HTTP status API exposing agent metrics.

use crate::{AgentMetrics, StopSignal};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use herald_error::{ConfigError, HeraldResult};
use serde_json::json;
use std::net::SocketAddr;
use tracing::info;

/// API state containing the metrics collector.
#[derive(Clone)]
pub struct ApiState {
    metrics: AgentMetrics,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(metrics: AgentMetrics) -> Self {
        Self { metrics }
    }
}

/// Creates the status API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn get_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.metrics.snapshot()))
}

/// Serve the status API on `bind` until `stop` fires.
///
/// # Errors
///
/// Returns a configuration error if the address cannot be bound.
pub async fn serve_status_api(
    bind: SocketAddr,
    metrics: AgentMetrics,
    mut stop: StopSignal,
) -> HeraldResult<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| ConfigError::new(format!("Failed to bind status API on {}: {}", bind, e)))?;
    info!(%bind, "Status API listening");

    axum::serve(listener, create_router(ApiState::new(metrics)))
        .with_graceful_shutdown(async move { stop.stopped().await })
        .await
        .map_err(|e| ConfigError::new(format!("Status API failed: {}", e)))?;
    Ok(())
}
