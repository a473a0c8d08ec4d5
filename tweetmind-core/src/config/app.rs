use super::error::ConfigError;
use super::loader::{env_secret, validate_positive};
use crate::application::agent::AgentOptions;
use crate::application::client::ClientOptions;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// SSE endpoint of the tool server
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub max_depth: usize,
    pub model_timeout: Duration,
    pub tool_timeout: Duration,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
}

#[derive(Debug, Clone)]
pub struct SocialSettings {
    pub endpoint: String,
    pub bearer_token_env: String,
}

/// Application configuration loaded from tweetmind.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub client: ClientSettings,
    pub agent: AgentSettings,
    pub model: ModelSettings,
    pub social: SocialSettings,
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<SocketAddr>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub max_depth: Option<usize>,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(endpoint) = overrides.endpoint {
            self.client.endpoint = endpoint;
        }
        if let Some(model) = overrides.model {
            if model.trim().is_empty() {
                return Err(ConfigError::Empty { field: "model" });
            }
            self.model.model = model;
        }
        if let Some(max_depth) = overrides.max_depth {
            self.agent.max_depth = validate_positive("max_depth", max_depth as u64)? as usize;
        }
        Ok(())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: self.client.connect_timeout,
            request_timeout: self.client.request_timeout,
        }
    }

    pub fn agent_options(&self) -> AgentOptions {
        AgentOptions {
            model: self.model.model.clone(),
            system_prompt: self.agent.system_prompt.clone(),
            max_depth: self.agent.max_depth,
            model_timeout: self.agent.model_timeout,
            tool_timeout: self.agent.tool_timeout,
        }
    }

    /// Gemini API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        env_secret(&self.model.api_key_env)
    }

    /// X bearer token from the configured environment variable
    pub fn bearer_token(&self) -> Option<String> {
        env_secret(&self.social.bearer_token_env)
    }
}
