//! Router configuration for the dashboard API

use axum::{routing::get, Router};

use crate::handlers;
use crate::AppState;

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Metrics
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/stats", get(handlers::stats))
        // Dashboard
        .route("/api/v1/filters", get(handlers::list_filters))
        .route("/api/v1/dashboard", get(handlers::dashboard))
        // Views
        .route("/api/v1/views", get(handlers::list_views))
        .route("/api/v1/views/{name}", get(handlers::get_view))
        .route("/api/v1/views/{name}/status", get(handlers::view_status))
        .with_state(state)
}
