mod error;

pub use error::ToolInvokeError;

use crate::application::registry::{InvocationError, ToolRegistry};
use crate::domain::tool::ToolResult;
use async_trait::async_trait;
use serde_json::Value;

/// Anything the agent can send a tool call through: a remote session or
/// an in-process registry.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    async fn invoke_tool(&self, name: &str, arguments: Value)
    -> Result<ToolResult, ToolInvokeError>;
}

impl From<InvocationError> for ToolInvokeError {
    fn from(error: InvocationError) -> Self {
        match error {
            InvocationError::UnknownTool(tool) => ToolInvokeError::UnknownTool { tool },
            InvocationError::Validation { tool, source } => ToolInvokeError::Validation {
                tool,
                message: source.to_string(),
            },
        }
    }
}

#[async_trait]
impl ToolGateway for ToolRegistry {
    async fn invoke_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolResult, ToolInvokeError> {
        Ok(self.invoke(name, arguments).await?)
    }
}
