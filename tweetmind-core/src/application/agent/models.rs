use crate::constants::DEFAULT_MODEL;
use std::time::Duration;

pub const DEFAULT_MAX_DEPTH: usize = 8;
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub model: String,
    pub system_prompt: Option<String>,
    /// Tool calls allowed while answering a single input.
    pub max_depth: usize,
    pub model_timeout: Duration,
    pub tool_timeout: Duration,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            max_depth: DEFAULT_MAX_DEPTH,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }
}
