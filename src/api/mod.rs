//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

pub use routes::create_router;

use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::domain::LoanPolicy;

/// Shared state of every route
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub policy: LoanPolicy,
}

impl AppState {
    pub fn new(pool: PgPool, policy: LoanPolicy) -> Self {
        Self { pool, policy }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Axum layers run last added first: context -> logging -> handler
    let api_routes = create_router()
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(axum::middleware::from_fn(middleware::context_middleware));

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
