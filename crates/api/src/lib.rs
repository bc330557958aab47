//! HTTP API server for the ticket recommendation service.
//!
//! Provides REST endpoints for recommendations and venue sell-out state,
//! with structured logging (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, InMemoryServices, build_state, create_default_state};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/recommendations", get(routes::recommendations::get))
        .route("/tickets/online", get(routes::tickets::online))
        .route("/tickets/sold-out", post(routes::tickets::sold_out))
        .route("/venues", get(routes::venues::list))
        .route("/venues/status", put(routes::venues::update_status))
        .route("/venues/{name}", get(routes::venues::get))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
