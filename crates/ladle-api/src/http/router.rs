//! Axum router configuration with middleware.
//!
//! Routes: `/api/chat` (GET descriptor, POST stream), `/api/upload`,
//! `/health`. Middleware: CORS, tracing.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ladle_types::upload::MAX_UPLOAD_BYTES;

use crate::http::handlers;
use crate::state::AppState;

/// Multipart framing allowance on top of the file itself, so an oversized
/// file still reaches validation and gets the size message.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = MAX_UPLOAD_BYTES as usize + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route(
            "/api/chat",
            get(handlers::chat::describe_chat).post(handlers::chat::stream_chat),
        )
        .route(
            "/api/upload",
            post(handlers::upload::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health -- unauthenticated liveness check.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
