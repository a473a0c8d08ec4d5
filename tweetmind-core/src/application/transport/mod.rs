//! # Session Transport
//!
//! Maps session ids to open duplex channels. A session is created when a
//! client opens its event stream, receives every message routed to its id
//! and disappears as soon as the stream is dropped or closed explicitly.

mod stream;

pub use stream::SessionStream;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("No transport found for sessionId {session_id}")]
    NotFound { session_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Per-session message processor. Returning `None` sends nothing back,
/// which is how notifications are answered.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: Value) -> Option<Value>;
}

struct SessionHandle {
    inbound: mpsc::UnboundedSender<Value>,
}

struct SessionManagerInner {
    handler: Arc<dyn MessageHandler>,
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl SessionManagerInner {
    fn sessions(&self) -> MutexGuard<'_, HashMap<String, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions().remove(session_id).is_some();
        if removed {
            info!(session_id, "Session closed");
        }
        removed
    }
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

impl SessionManager {
    pub fn new(handler: Arc<dyn MessageHandler>) -> Self {
        Self {
            inner: Arc::new(SessionManagerInner {
                handler,
                sessions: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Registers a fresh session and returns the stream of messages
    /// destined for its client. Must be called inside a tokio runtime.
    pub fn open_session(&self) -> SessionStream {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let session_id = {
            let mut sessions = self.inner.sessions();
            let mut candidate = Uuid::new_v4().to_string();
            while sessions.contains_key(&candidate) {
                candidate = Uuid::new_v4().to_string();
            }
            sessions.insert(
                candidate.clone(),
                SessionHandle {
                    inbound: inbound_tx,
                },
            );
            candidate
        };

        tokio::spawn(dispatch(
            session_id.clone(),
            Arc::clone(&self.inner.handler),
            inbound_rx,
            outbound_tx,
        ));

        info!(session_id = %session_id, "Session opened");
        SessionStream::new(session_id, Arc::downgrade(&self.inner), outbound_rx)
    }

    /// Hands `payload` to the session's handler without waiting for it.
    pub fn route_message(&self, session_id: &str, payload: Value) -> Result<(), TransportError> {
        let sessions = self.inner.sessions();
        let delivered = sessions
            .get(session_id)
            .is_some_and(|handle| handle.inbound.send(payload).is_ok());
        if delivered {
            debug!(session_id, "Routed message to session");
            Ok(())
        } else {
            warn!(session_id, "No transport found for session");
            Err(TransportError::NotFound {
                session_id: session_id.to_string(),
            })
        }
    }

    pub fn close_session(&self, session_id: &str) -> bool {
        self.inner.remove(session_id)
    }

    pub fn state(&self, session_id: &str) -> SessionState {
        if self.contains(session_id) {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.inner.sessions().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.inner.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

async fn dispatch(
    session_id: String,
    handler: Arc<dyn MessageHandler>,
    mut inbound: mpsc::UnboundedReceiver<Value>,
    outbound: mpsc::UnboundedSender<Value>,
) {
    while let Some(message) = inbound.recv().await {
        let handler = Arc::clone(&handler);
        let outbound = outbound.clone();
        let session_id = session_id.clone();
        tokio::spawn(async move {
            if let Some(reply) = handler.handle(message).await
                && outbound.send(reply).is_err()
            {
                debug!(session_id = %session_id, "Dropping reply for closed session");
            }
        });
    }
    debug!(session_id = %session_id, "Session dispatcher stopped");
}

#[cfg(test)]
mod tests;
