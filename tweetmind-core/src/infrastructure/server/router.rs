use super::routes;
use super::state::ServerState;
use crate::constants::{MESSAGES_PATH, SSE_PATH};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(SSE_PATH, get(routes::sse::sse_handler))
        .route(MESSAGES_PATH, post(routes::messages::messages_handler))
        .route("/health", get(routes::health::health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
