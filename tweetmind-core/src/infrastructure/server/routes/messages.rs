use crate::rpc::RpcResponse;
use crate::server::ServerState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

const NO_TRANSPORT: &str = "No transport found for sessionId";

#[derive(Debug, Deserialize)]
pub(crate) struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Accepts a JSON-RPC message for one session. The reply, if any, is
/// delivered on that session's event stream, never in this response.
pub(crate) async fn messages_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing sessionId parameter").into_response();
    };
    if !state.sessions().contains(&session_id) {
        warn!(session_id = %session_id, "Message for unknown session");
        return (StatusCode::BAD_REQUEST, NO_TRANSPORT).into_response();
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(session_id = %session_id, %err, "Rejecting unparseable message body");
            let reply = RpcResponse::parse_error(format!("Parse error: {err}"));
            return (StatusCode::BAD_REQUEST, Json(reply)).into_response();
        }
    };

    match state.sessions().route_message(&session_id, payload) {
        Ok(()) => (StatusCode::ACCEPTED, "Accepted").into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, NO_TRANSPORT).into_response(),
    }
}
