//! REST API over a finished simulation run.
//!
//! Provides three GET endpoints:
//! - `/summary`: scenario config, period averages and steady states
//! - `/trajectory`: flattened trajectory with optional step range filtering
//! - `/steady-state`: stationary distribution of each period's matrix

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::ScenarioConfig;
use crate::sim::summary::RunSummary;
use crate::sim::types::Trajectory;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the simulation run completes and wrapped in
/// `Arc`; no locks since all data is read-only.
pub struct AppState {
    /// Scenario the run was built from.
    pub config: ScenarioConfig,
    /// Period averages and steady states.
    pub summary: RunSummary,
    /// Recorded distributions.
    pub trajectory: Trajectory,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/trajectory", get(handlers::get_trajectory))
        .route("/steady-state", get(handlers::get_steady_state))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{addr}");
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
