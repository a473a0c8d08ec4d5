use crate::server::ServerState;
use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    uptime_secs: u64,
    version: &'static str,
    active_sessions: usize,
}

pub(crate) async fn health_handler(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        uptime_secs: state.uptime_secs(),
        version: env!("CARGO_PKG_VERSION"),
        active_sessions: state.sessions().len(),
    })
}
