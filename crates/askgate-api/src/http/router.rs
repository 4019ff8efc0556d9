//! Axum router configuration with middleware.
//!
//! Routes are mounted at the root (no version prefix); the surface is small
//! enough that versioning would add nothing. Middleware: CORS, tracing.

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
        .route("/ask", post(handlers::chat::ask))
        .route("/user-status", get(handlers::user::user_status))
        .route(
            "/reset-daily-count",
            post(handlers::user::reset_daily_count),
        )
        .route(
            "/clean-chat-history",
            get(handlers::chat::clean_chat_history),
        )
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
