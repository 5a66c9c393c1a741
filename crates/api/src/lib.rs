//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for financials, results posting, budget periods, and
//!   the audit log
//! - The role→path-prefix authorization policy and its guard middleware
//! - Response types

pub mod middleware;
pub mod policy;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use schola_store::AppStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application-state store.
    pub store: Arc<AppStore>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
