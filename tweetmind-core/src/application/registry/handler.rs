use crate::domain::tool::ToolResult;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

/// Failure of the collaborator behind a tool (auth, permission, duplicate
/// submission, rate limit, network).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UpstreamError {
    message: String,
}

impl UpstreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Handler contract: every outcome is a value, never a propagated fault.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Value) -> Result<ToolResult, UpstreamError>;
}

pub struct FnHandler<F>(F);

/// Wrap an async closure as a [`ToolHandler`].
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolResult, UpstreamError>> + Send,
{
    FnHandler(f)
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolResult, UpstreamError>> + Send,
{
    async fn call(&self, arguments: Value) -> Result<ToolResult, UpstreamError> {
        (self.0)(arguments).await
    }
}
