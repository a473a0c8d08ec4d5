use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolInvokeError {
    #[error("unknown tool '{tool}'")]
    UnknownTool { tool: String },
    #[error("invalid arguments for tool '{tool}': {message}")]
    Validation { tool: String, message: String },
    #[error("tool '{tool}' failed upstream: {message}")]
    Upstream { tool: String, message: String },
    #[error("no transport found for session '{session_id}'")]
    TransportNotFound { session_id: String },
    #[error("transport error: {message}")]
    Transport { message: String },
    #[error("server returned JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("server sent invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl ToolInvokeError {
    /// Structural failures mean the session or protocol is broken, as
    /// opposed to an ordinary tool-level failure the model can react to.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ToolInvokeError::TransportNotFound { .. }
                | ToolInvokeError::Transport { .. }
                | ToolInvokeError::Rpc { .. }
                | ToolInvokeError::InvalidJson { .. }
        )
    }

    /// Diagnostic text handed back to the model in place of a result.
    pub fn diagnostic(&self) -> String {
        match self {
            ToolInvokeError::UnknownTool { tool } => {
                format!("Tool \"{tool}\" is not available on the server.")
            }
            ToolInvokeError::Validation { tool, message } => {
                format!("Tool \"{tool}\" rejected its arguments: {message}")
            }
            ToolInvokeError::Upstream { tool, message } => {
                format!("Tool \"{tool}\" failed: {message}")
            }
            other => format!("Tool call could not be delivered: {other}"),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ToolInvokeError::TransportNotFound { .. } => {
                "The connection to the tool server was lost. Please reconnect and try again."
                    .to_string()
            }
            ToolInvokeError::Transport { .. } | ToolInvokeError::InvalidJson { .. } => {
                "The tool server could not be reached.".to_string()
            }
            ToolInvokeError::Rpc { message, .. } => {
                format!("The tool server reported an error: {message}")
            }
            other => other.diagnostic(),
        }
    }
}
