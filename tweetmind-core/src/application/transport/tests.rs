use super::*;
use serde_json::json;
use std::time::Duration;
use tokio_stream::StreamExt;

struct EchoHandler;

#[async_trait]
impl MessageHandler for EchoHandler {
    async fn handle(&self, message: Value) -> Option<Value> {
        if message.get("silent").is_some() {
            return None;
        }
        Some(json!({ "echo": message }))
    }
}

fn manager() -> SessionManager {
    SessionManager::new(Arc::new(EchoHandler))
}

async fn next(stream: &mut SessionStream) -> Value {
    tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("message in time")
        .expect("stream open")
}

#[tokio::test]
async fn sessions_get_distinct_ids() {
    let manager = manager();
    let first = manager.open_session();
    let second = manager.open_session();
    assert_ne!(first.id(), second.id());
    assert_eq!(manager.len(), 2);
    assert_eq!(manager.state(first.id()), SessionState::Open);
}

#[tokio::test]
async fn routed_message_reaches_only_its_session() {
    let manager = manager();
    let mut first = manager.open_session();
    let mut second = manager.open_session();

    manager
        .route_message(second.id(), json!({"n": 2}))
        .expect("route");
    manager
        .route_message(first.id(), json!({"n": 1}))
        .expect("route");

    assert_eq!(next(&mut first).await, json!({"echo": {"n": 1}}));
    assert_eq!(next(&mut second).await, json!({"echo": {"n": 2}}));
}

#[tokio::test]
async fn notifications_produce_no_reply() {
    let manager = manager();
    let mut stream = manager.open_session();
    manager
        .route_message(stream.id(), json!({"silent": true}))
        .expect("route");
    manager
        .route_message(stream.id(), json!({"after": true}))
        .expect("route");
    assert_eq!(next(&mut stream).await, json!({"echo": {"after": true}}));
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let manager = manager();
    let err = manager.route_message("missing", json!({})).unwrap_err();
    assert_eq!(
        err,
        TransportError::NotFound {
            session_id: "missing".to_string()
        }
    );
    assert_eq!(err.to_string(), "No transport found for sessionId missing");
}

#[tokio::test]
async fn closed_session_rejects_messages() {
    let manager = manager();
    let stream = manager.open_session();
    let id = stream.id().to_string();

    assert!(manager.close_session(&id));
    assert!(!manager.close_session(&id));
    assert_eq!(manager.state(&id), SessionState::Closed);
    assert!(matches!(
        manager.route_message(&id, json!({})),
        Err(TransportError::NotFound { .. })
    ));
}

#[tokio::test]
async fn dropping_stream_closes_session() {
    let manager = manager();
    let stream = manager.open_session();
    let id = stream.id().to_string();
    assert!(manager.contains(&id));

    drop(stream);
    assert!(!manager.contains(&id));
    assert!(manager.is_empty());
    assert!(manager.route_message(&id, json!({})).is_err());
}

#[tokio::test]
async fn closing_ends_the_outbound_stream() {
    let manager = manager();
    let mut stream = manager.open_session();
    let id = stream.id().to_string();
    manager.close_session(&id);

    let end = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("stream ends in time");
    assert!(end.is_none());
}
