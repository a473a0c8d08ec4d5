use super::SessionManagerInner;
use serde_json::Value;
use std::pin::Pin;
use std::sync::Weak;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Outbound half of a session. Dropping it closes the session.
pub struct SessionStream {
    session_id: String,
    manager: Weak<SessionManagerInner>,
    messages: UnboundedReceiverStream<Value>,
}

impl SessionStream {
    pub(super) fn new(
        session_id: String,
        manager: Weak<SessionManagerInner>,
        receiver: mpsc::UnboundedReceiver<Value>,
    ) -> Self {
        Self {
            session_id,
            manager,
            messages: UnboundedReceiverStream::new(receiver),
        }
    }

    pub fn id(&self) -> &str {
        &self.session_id
    }
}

impl Stream for SessionStream {
    type Item = Value;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Value>> {
        Pin::new(&mut self.messages).poll_next(cx)
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.remove(&self.session_id);
        }
    }
}
