//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers;
use super::handlers::AppState;

/// Create the application router
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Career matching
        .route("/api/career/matches", post(handlers::career_matches))
        .route("/api/career/analyze", post(handlers::career_analyze))
        // Conversational guidance
        .route("/chat/start", post(handlers::chat_start))
        .route("/chat/message", post(handlers::chat_message))
        .route("/chat/summary/:session_id", get(handlers::chat_summary))
        .route("/chat/reset/:session_id", post(handlers::chat_reset))
        // Statistics
        .route("/stats", get(handlers::get_stats))
        .with_state(state)
}
