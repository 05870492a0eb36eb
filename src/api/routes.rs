//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers;
use super::handlers::AppState;

/// Create the API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Retrieval-augmented question answering
        .route("/ask", post(handlers::ask))
        .with_state(state)
}
