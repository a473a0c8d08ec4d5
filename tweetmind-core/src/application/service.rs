//! MCP protocol service
//!
//! Answers the JSON-RPC messages routed into a session: the handshake,
//! tool discovery and tool calls, all backed by a [`ToolRegistry`].

use crate::application::registry::{InvocationError, ToolRegistry};
use crate::application::transport::MessageHandler;
use crate::constants::{PROTOCOL_VERSION, SERVER_NAME};
use crate::rpc::{INTERNAL_ERROR, RpcRequest, RpcResponse};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub struct McpService {
    registry: Arc<ToolRegistry>,
    version: String,
}

impl McpService {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn handle_request(&self, request: RpcRequest) -> Option<RpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Received notification");
            return None;
        }
        let id = request.id.clone();
        if request.jsonrpc != "2.0" {
            return Some(RpcResponse::invalid_request(
                id,
                "Unsupported jsonrpc version (expected 2.0)",
            ));
        }

        debug!(method = %request.method, "Received JSON-RPC request");
        let response = match request.method.as_str() {
            "initialize" => RpcResponse::success(id, self.server_info()),
            "ping" => RpcResponse::success(id, json!({})),
            "tools/list" => self.list_tools(id),
            "tools/call" => self.call_tool(id, request.params).await,
            other => {
                warn!(method = other, "Unknown JSON-RPC method");
                RpcResponse::method_not_found(id, other)
            }
        };
        Some(response)
    }

    fn server_info(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": self.version,
            },
            "capabilities": {
                "tools": {}
            }
        })
    }

    fn list_tools(&self, id: Option<Value>) -> RpcResponse {
        RpcResponse::success(id, json!({ "tools": self.registry.list() }))
    }

    async fn call_tool(&self, id: Option<Value>, params: Option<Value>) -> RpcResponse {
        let params: CallToolParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(err)) => {
                return RpcResponse::invalid_params(id, format!("invalid tools/call params: {err}"));
            }
            None => return RpcResponse::invalid_params(id, "missing tools/call params"),
        };

        match self.registry.invoke(&params.name, params.arguments).await {
            Ok(result) => match serde_json::to_value(&result) {
                Ok(value) => RpcResponse::success(id, value),
                Err(err) => RpcResponse::error(id, INTERNAL_ERROR, err.to_string()),
            },
            Err(err) => {
                let kind = match &err {
                    InvocationError::UnknownTool(_) => "unknown_tool",
                    InvocationError::Validation { .. } => "validation",
                };
                RpcResponse::invalid_params(id, err.to_string())
                    .with_data(json!({ "kind": kind, "tool": params.name }))
            }
        }
    }
}

#[async_trait]
impl MessageHandler for McpService {
    async fn handle(&self, message: Value) -> Option<Value> {
        let request: RpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "Rejecting malformed JSON-RPC message");
                return Some(RpcResponse::invalid_request(None, err.to_string()).to_value());
            }
        };
        self.handle_request(request)
            .await
            .map(|response| response.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::registry::handler_fn;
    use crate::domain::schema::{Parameters, Schema};
    use crate::domain::tool::{ToolDescriptor, ToolResult};

    fn service() -> McpService {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::new(
                    "echo",
                    "Echo text",
                    Parameters::new().required("text", Schema::string()),
                ),
                handler_fn(|arguments: Value| async move {
                    let text = arguments["text"].as_str().unwrap_or_default().to_string();
                    Ok(ToolResult::text(text))
                }),
            )
            .expect("register");
        McpService::new(Arc::new(registry))
    }

    async fn call(service: &McpService, message: Value) -> Value {
        service.handle(message).await.expect("reply")
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let reply = call(
            &service(),
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        )
        .await;
        assert_eq!(reply["result"]["serverInfo"]["name"], json!(SERVER_NAME));
        assert_eq!(reply["result"]["protocolVersion"], json!(PROTOCOL_VERSION));
    }

    #[tokio::test]
    async fn notifications_get_no_reply() {
        let reply = service()
            .handle(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn tools_list_uses_input_schema() {
        let reply = call(
            &service(),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        )
        .await;
        let tool = &reply["result"]["tools"][0];
        assert_eq!(tool["name"], json!("echo"));
        assert_eq!(tool["inputSchema"]["type"], json!("object"));
        assert_eq!(tool["inputSchema"]["required"], json!(["text"]));
    }

    #[tokio::test]
    async fn tools_call_returns_content() {
        let reply = call(
            &service(),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
                   "params": {"name": "echo", "arguments": {"text": "hi"}}}),
        )
        .await;
        assert_eq!(reply["id"], json!(3));
        assert_eq!(reply["result"]["content"][0]["text"], json!("hi"));
        assert_eq!(reply["result"]["isError"], json!(false));
    }

    #[tokio::test]
    async fn unknown_tool_and_validation_use_invalid_params() {
        let service = service();
        let unknown = call(
            &service,
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
                   "params": {"name": "nope", "arguments": {}}}),
        )
        .await;
        assert_eq!(unknown["error"]["code"], json!(-32602));
        assert_eq!(unknown["error"]["data"]["kind"], json!("unknown_tool"));

        let invalid = call(
            &service,
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
                   "params": {"name": "echo", "arguments": {}}}),
        )
        .await;
        assert_eq!(invalid["error"]["code"], json!(-32602));
        assert_eq!(invalid["error"]["data"]["kind"], json!("validation"));
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let reply = call(
            &service(),
            json!({"jsonrpc": "2.0", "id": 6, "method": "resources/list"}),
        )
        .await;
        assert_eq!(reply["error"]["code"], json!(-32601));
    }
}
