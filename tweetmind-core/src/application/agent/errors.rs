use crate::application::gateway::ToolInvokeError;
use crate::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("tool '{tool}' could not be executed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolInvokeError,
    },
    #[error("agent exceeded the maximum of {limit} tool calls for one input")]
    DepthExceeded { limit: usize },
}

impl AgentError {
    /// Text shown to the user and recorded as the closing model turn.
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Model(err) => err.user_message(),
            AgentError::Tool { source, .. } => source.user_message(),
            AgentError::DepthExceeded { limit } => format!(
                "I stopped after {limit} tool calls without reaching an answer. Please try a simpler request."
            ),
        }
    }
}
