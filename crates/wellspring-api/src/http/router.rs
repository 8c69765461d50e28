//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/chat", post(handlers::chat::create_chat_completion))
        .route("/chat/{session_id}", get(handlers::chat::get_chat_history))
        .route("/newsletter", post(handlers::newsletter::subscribe))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
