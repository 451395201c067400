use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::app_state::AppState;
use crate::handlers;

/// Create the main application router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // MCP over SSE: the stream hands out a per-session POST endpoint
        .route("/sse", get(handlers::sse_connect))
        .route("/messages", post(handlers::post_message))
        // Stateless request/response, answered in the POST body
        .route("/mcp", post(handlers::mcp_request))
        // CORS: allow any origin (MCP clients may run in browsers or desktop apps)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
