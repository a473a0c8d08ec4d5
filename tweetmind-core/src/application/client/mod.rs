//! # Protocol Client
//!
//! Opens a session against the SSE transport, performs the MCP handshake
//! and then exchanges JSON-RPC requests: each request is POSTed to the
//! session's message endpoint and its response arrives on the event
//! stream, where the reader task hands it to the waiting caller.

mod error;
mod options;

pub use error::ClientError;
pub use options::{ClientOptions, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};

use crate::application::gateway::{ToolGateway, ToolInvokeError};
use crate::constants::PROTOCOL_VERSION;
use crate::domain::tool::{ToolDeclaration, ToolDescriptor, ToolResult, declarations};
use crate::rpc::{INVALID_PARAMS, RpcError, RpcRequest, RpcResponse};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode, Url};
use reqwest_eventsource::{Event, EventSource, retry};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Result of `tools/list`: the descriptors as served plus their
/// projection into model declarations, both in server order.
#[derive(Debug, Clone)]
pub struct DiscoveredTools {
    pub descriptors: Vec<ToolDescriptor>,
    pub declarations: Vec<ToolDeclaration>,
}

#[derive(Deserialize)]
struct ToolListResult {
    tools: Vec<ToolDescriptor>,
}

type Pending = HashMap<String, oneshot::Sender<RpcResponse>>;

pub struct McpClient {
    inner: Arc<ClientInner>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

struct ClientInner {
    http: Client,
    messages_url: Url,
    session_id: String,
    pending: Mutex<Pending>,
    id_counter: AtomicU64,
    closed: AtomicBool,
    request_timeout: Duration,
}

impl McpClient {
    /// Connects to the server's SSE endpoint (e.g. `http://127.0.0.1:3001/sse`).
    pub async fn connect(endpoint: &str, options: ClientOptions) -> Result<Self, ClientError> {
        let sse_url =
            Url::parse(endpoint).map_err(|err| ClientError::connection(endpoint, err.to_string()))?;
        let http = Client::builder()
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|err| ClientError::connection(endpoint, err.to_string()))?;

        let mut events = EventSource::new(http.get(sse_url.clone())).map_err(|_| {
            ClientError::connection(endpoint, "event stream request cannot be created")
        })?;
        events.set_retry_policy(Box::new(retry::Never));

        let path =
            match tokio::time::timeout(options.connect_timeout, wait_for_endpoint(&mut events))
                .await
            {
                Ok(Ok(path)) => path,
                Ok(Err(message)) => {
                    events.close();
                    return Err(ClientError::connection(endpoint, message));
                }
                Err(_) => {
                    events.close();
                    return Err(ClientError::connection(
                        endpoint,
                        "timed out waiting for the session endpoint",
                    ));
                }
            };

        let messages_url = sse_url
            .join(&path)
            .map_err(|err| ClientError::connection(endpoint, err.to_string()))?;
        let session_id = messages_url
            .query_pairs()
            .find(|(key, _)| key == "sessionId")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| {
                ClientError::connection(endpoint, format!("endpoint '{path}' carries no sessionId"))
            })?;

        let inner = Arc::new(ClientInner {
            http,
            messages_url,
            session_id,
            pending: Mutex::new(HashMap::new()),
            id_counter: AtomicU64::new(1),
            closed: AtomicBool::new(false),
            request_timeout: options.request_timeout,
        });
        let reader = tokio::spawn(Arc::clone(&inner).reader_loop(events));
        let client = Self {
            inner,
            reader: Mutex::new(Some(reader)),
        };

        match tokio::time::timeout(options.connect_timeout, client.inner.initialize()).await {
            Ok(Ok(())) => {
                info!(
                    session_id = %client.inner.session_id,
                    endpoint,
                    "Connected to tool server"
                );
                Ok(client)
            }
            Ok(Err(err)) => {
                client.close();
                Err(ClientError::connection(endpoint, err.to_string()))
            }
            Err(_) => {
                client.close();
                Err(ClientError::connection(
                    endpoint,
                    "timed out during the initialize handshake",
                ))
            }
        }
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub async fn discover_tools(&self) -> Result<DiscoveredTools, ClientError> {
        if self.is_closed() {
            return Err(ClientError::discovery("session is closed"));
        }
        let response = self
            .inner
            .exchange("tools/list", json!({}))
            .await
            .map_err(|err| ClientError::discovery(err.to_string()))?;
        if let Some(error) = response.error {
            return Err(ClientError::discovery(format!(
                "server returned error {}: {}",
                error.code, error.message
            )));
        }
        let result = response.result.unwrap_or(Value::Null);
        let list: ToolListResult = serde_json::from_value(result)
            .map_err(|err| ClientError::discovery(format!("malformed tool list: {err}")))?;

        let declarations = declarations(&list.tools);
        info!(tools = list.tools.len(), "Discovered tools");
        Ok(DiscoveredTools {
            descriptors: list.tools,
            declarations,
        })
    }

    pub async fn invoke_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolResult, ToolInvokeError> {
        let params = json!({
            "name": name,
            "arguments": match arguments {
                Value::Null => Value::Object(Default::default()),
                other => other,
            }
        });
        debug!(tool = name, "Calling remote tool");
        let response = self
            .inner
            .exchange("tools/call", params)
            .await
            .map_err(|err| match err {
                ToolInvokeError::Upstream { message, .. } => ToolInvokeError::Upstream {
                    tool: name.to_string(),
                    message,
                },
                other => other,
            })?;

        if let Some(error) = response.error {
            return Err(classify_error(name, error));
        }
        serde_json::from_value(response.result.unwrap_or(Value::Null))
            .map_err(|source| ToolInvokeError::InvalidJson { source })
    }

    /// Drops the event stream. Pending and later requests fail with
    /// `TransportNotFound`.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        let reader = self
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(reader) = reader {
            reader.abort();
        }
        self.inner.fail_all_pending();
    }
}

impl Drop for McpClient {
    fn drop(&mut self) {
        self.close();
    }
}

#[async_trait]
impl ToolGateway for McpClient {
    async fn invoke_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolResult, ToolInvokeError> {
        McpClient::invoke_tool(self, name, arguments).await
    }
}

impl ClientInner {
    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn not_found(&self) -> ToolInvokeError {
        ToolInvokeError::TransportNotFound {
            session_id: self.session_id.clone(),
        }
    }

    fn fail_all_pending(&self) {
        let dropped = {
            let mut pending = self.pending();
            let count = pending.len();
            pending.clear();
            count
        };
        if dropped > 0 {
            debug!(session_id = %self.session_id, dropped, "Failed pending requests");
        }
    }

    async fn initialize(&self) -> Result<(), ToolInvokeError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
            "capabilities": {}
        });
        let response = self.exchange("initialize", params).await?;
        if let Some(error) = response.error {
            return Err(ToolInvokeError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.post(&RpcRequest::notification("notifications/initialized"))
            .await
    }

    async fn exchange(&self, method: &str, params: Value) -> Result<RpcResponse, ToolInvokeError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(self.not_found());
        }
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        let key = id.to_string();
        let (tx, rx) = oneshot::channel();
        self.pending().insert(key.clone(), tx);
        let _entry = PendingEntry { inner: self, key };

        self.post(&RpcRequest::new(json!(id), method, params)).await?;

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(self.not_found()),
            Err(_) => {
                warn!(method, timeout_secs = self.request_timeout.as_secs(), "Request timed out");
                Err(ToolInvokeError::Upstream {
                    tool: method.to_string(),
                    message: format!(
                        "no response within {} seconds",
                        self.request_timeout.as_secs()
                    ),
                })
            }
        }
    }

    async fn post<T: Serialize>(&self, payload: &T) -> Result<(), ToolInvokeError> {
        let response = self
            .http
            .post(self.messages_url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|err| ToolInvokeError::Transport {
                message: err.to_string(),
            })?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::BAD_REQUEST => {
                warn!(session_id = %self.session_id, "Server no longer knows this session");
                self.closed.store(true, Ordering::SeqCst);
                Err(self.not_found())
            }
            status => Err(ToolInvokeError::Transport {
                message: format!("server answered {status}"),
            }),
        }
    }

    async fn reader_loop(self: Arc<Self>, mut events: EventSource) {
        while let Some(event) = events.next().await {
            match event {
                Ok(Event::Message(message)) if message.event == "message" => {
                    self.process_inbound(&message.data);
                }
                Ok(Event::Message(message)) => {
                    debug!(event = %message.event, "Ignoring unexpected event");
                }
                Ok(Event::Open) => {}
                Err(err) => {
                    warn!(session_id = %self.session_id, %err, "Event stream ended");
                    break;
                }
            }
        }
        events.close();
        self.closed.store(true, Ordering::SeqCst);
        self.fail_all_pending();
        info!(session_id = %self.session_id, "Session stream closed");
    }

    fn process_inbound(&self, data: &str) {
        let value: Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "Received invalid JSON from tool server");
                return;
            }
        };

        if value.get("method").is_some() {
            debug!(method = ?value.get("method"), "Ignoring server-initiated message");
            return;
        }
        let Some(key) = value.get("id").and_then(response_key) else {
            debug!("Received response without a usable id");
            return;
        };
        let response: RpcResponse = match serde_json::from_value(value) {
            Ok(response) => response,
            Err(err) => {
                warn!(%err, response_id = %key, "Received malformed JSON-RPC response");
                return;
            }
        };

        let responder = self.pending().remove(&key);
        match responder {
            Some(sender) => {
                let _ = sender.send(response);
            }
            None => debug!(response_id = %key, "Received response for unknown request"),
        }
    }
}

/// Removes a request's pending slot however the exchange ends, including
/// when the caller drops the future mid-flight.
struct PendingEntry<'a> {
    inner: &'a ClientInner,
    key: String,
}

impl Drop for PendingEntry<'_> {
    fn drop(&mut self) {
        self.inner.pending().remove(&self.key);
    }
}

async fn wait_for_endpoint(events: &mut EventSource) -> Result<String, String> {
    while let Some(event) = events.next().await {
        match event {
            Ok(Event::Open) => debug!("Event stream opened"),
            Ok(Event::Message(message)) if message.event == "endpoint" => {
                return Ok(message.data);
            }
            Ok(Event::Message(message)) => {
                debug!(event = %message.event, "Ignoring event before endpoint");
            }
            Err(err) => return Err(err.to_string()),
        }
    }
    Err("event stream ended before the session endpoint arrived".to_string())
}

fn response_key(id: &Value) -> Option<String> {
    match id {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}

fn classify_error(tool: &str, error: RpcError) -> ToolInvokeError {
    match (error.code, error.kind()) {
        (INVALID_PARAMS, Some("unknown_tool")) => ToolInvokeError::UnknownTool {
            tool: tool.to_string(),
        },
        (INVALID_PARAMS, Some("validation")) => ToolInvokeError::Validation {
            tool: tool.to_string(),
            message: error.message,
        },
        _ => ToolInvokeError::Rpc {
            code: error.code,
            message: error.message,
        },
    }
}
