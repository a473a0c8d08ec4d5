// Session transport tests - SSE handshake and message endpoint behavior
//
// Runs the real server on an ephemeral port and talks to it over HTTP.

mod common;

use common::{StoppableServer, TestServer, hanging_registry};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tweetmind_core::client::{ClientOptions, DEFAULT_REQUEST_TIMEOUT, McpClient};
use tweetmind_core::gateway::ToolInvokeError;

// ============================================================================
// Handshake
// ============================================================================

#[tokio::test]
async fn connect_yields_a_session_id() {
    let server = TestServer::start().await;
    let client = server.connect().await;

    assert!(!client.session_id().is_empty());
    assert!(!client.is_closed());
}

#[tokio::test]
async fn two_clients_get_distinct_sessions() {
    let server = TestServer::start().await;
    let first = server.connect().await;
    let second = server.connect().await;

    assert_ne!(first.session_id(), second.session_id());
}

#[tokio::test]
async fn connect_to_nothing_is_a_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = McpClient::connect(&format!("http://{addr}/sse"), ClientOptions::default())
        .await
        .err()
        .expect("nothing listens there");
    assert!(err.user_message().contains("Could not connect"));
}

// ============================================================================
// Message endpoint
// ============================================================================

#[tokio::test]
async fn message_without_session_id_is_rejected() {
    let server = TestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/messages"))
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.text().await.expect("body"),
        "Missing sessionId parameter"
    );
}

#[tokio::test]
async fn message_for_unknown_session_is_rejected() {
    let server = TestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/messages?sessionId=not-a-session"))
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status().as_u16(), 400);
    assert!(
        response
            .text()
            .await
            .expect("body")
            .starts_with("No transport found for sessionId")
    );
}

#[tokio::test]
async fn unparseable_body_gets_a_parse_error() {
    let server = TestServer::start().await;
    let client = server.connect().await;
    let response = reqwest::Client::new()
        .post(server.url(&format!("/messages?sessionId={}", client.session_id())))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"]["code"], json!(-32700));
}

#[tokio::test]
async fn valid_message_is_accepted() {
    let server = TestServer::start().await;
    let client = server.connect().await;
    let response = reqwest::Client::new()
        .post(server.url(&format!("/messages?sessionId={}", client.session_id())))
        .json(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status().as_u16(), 202);
}

// ============================================================================
// Closing
// ============================================================================

#[tokio::test]
async fn closed_client_reports_transport_not_found() {
    let server = TestServer::start().await;
    let client = server.connect().await;
    let session_id = client.session_id().to_string();

    client.close();
    assert!(client.is_closed());

    let err = client
        .invoke_tool("addTwoNumbers", json!({"a": 1, "b": 2}))
        .await
        .unwrap_err();
    match err {
        ToolInvokeError::TransportNotFound { session_id: reported } => {
            assert_eq!(reported, session_id)
        }
        other => panic!("expected TransportNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn health_counts_open_sessions() {
    let server = TestServer::start().await;
    let _client = server.connect().await;

    let health: Value = reqwest::get(server.url("/health"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");

    assert_eq!(health["status"], json!("ok"));
    assert!(health["active_sessions"].as_u64().expect("count") >= 1);
}

// ============================================================================
// Cancellation
// ============================================================================

/// Opens a raw event stream and reads until the endpoint event arrives.
async fn open_raw_session(server: &TestServer) -> (reqwest::Response, String) {
    let mut response = reqwest::get(server.url("/sse")).await.expect("open stream");
    let mut buffer = String::new();
    loop {
        let chunk = response
            .chunk()
            .await
            .expect("read stream")
            .expect("stream ended before the endpoint event");
        buffer.push_str(&String::from_utf8_lossy(&chunk));
        if let Some(path) = buffer
            .lines()
            .find_map(|line| line.strip_prefix("data:"))
            .map(|data| data.trim().to_string())
            .filter(|path| path.contains("sessionId="))
        {
            return (response, path);
        }
    }
}

#[tokio::test]
async fn session_is_gone_once_its_stream_is_dropped() {
    let server = TestServer::start().await;
    let (stream, path) = open_raw_session(&server).await;
    let http = reqwest::Client::new();
    let ping = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});

    let accepted = http
        .post(server.url(&path))
        .json(&ping)
        .send()
        .await
        .expect("request");
    assert_eq!(accepted.status().as_u16(), 202);

    drop(stream);

    // Replies written to the dead stream make the server notice the
    // disconnect; from then on the id is unknown.
    let rejected = tokio::time::timeout(Duration::from_secs(20), async {
        loop {
            let response = http
                .post(server.url(&path))
                .json(&ping)
                .send()
                .await
                .expect("request");
            if response.status().as_u16() == 400 {
                return response.text().await.expect("body");
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("session was never closed");

    assert!(rejected.starts_with("No transport found for sessionId"));
}

#[tokio::test]
async fn in_flight_call_fails_fast_when_the_server_goes_away() {
    let mut server = StoppableServer::start(hanging_registry());
    let client = Arc::new(
        McpClient::connect(&server.sse_url(), ClientOptions::default())
            .await
            .expect("connect"),
    );

    let caller = Arc::clone(&client);
    let call = tokio::spawn(async move { caller.invoke_tool("hang", json!({})).await });
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    server.stop();
    let outcome = tokio::time::timeout(Duration::from_secs(5), call)
        .await
        .expect("call still blocked after the server stopped")
        .expect("call task");

    assert!(started.elapsed() < DEFAULT_REQUEST_TIMEOUT);
    assert!(
        matches!(outcome, Err(ToolInvokeError::TransportNotFound { .. })),
        "got {outcome:?}"
    );
    assert!(client.is_closed());
}
