use crate::constants::MESSAGES_PATH;
use crate::server::ServerState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

/// Opens a session. The first event names the endpoint the client must
/// POST to; every later event is one JSON-RPC message for that client.
/// The session lives exactly as long as this response stream.
pub(crate) async fn sse_handler(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session = state.sessions().open_session();
    let endpoint = format!("{MESSAGES_PATH}?sessionId={}", session.id());
    debug!(endpoint = %endpoint, "Announcing session endpoint");

    let announce = stream::once(async move { Ok(Event::default().event("endpoint").data(endpoint)) });
    let messages = session.map(|message| {
        Ok(Event::default()
            .event("message")
            .data(message.to_string()))
    });

    Sse::new(announce.chain(messages)).keep_alive(KeepAlive::default())
}
