// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod views;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::{health, planner, session};
pub use state::AppState;

/// Builds the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(planner::index))
        .route("/plan", post(planner::submit_plan))
        .route("/health", get(health::health_check))
        .route("/api/plans", post(planner::create_plan))
        .route("/api/session", get(session::get_session))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
