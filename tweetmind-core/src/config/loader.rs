use super::app::{
    AgentSettings, AppConfig, ClientSettings, ModelSettings, ServerSettings, SocialSettings,
};
use super::defaults::{
    DEFAULT_API_KEY_ENV, DEFAULT_BEARER_TOKEN_ENV, DEFAULT_BIND, DEFAULT_CLIENT_ENDPOINT,
    DEFAULT_SYSTEM_PROMPT,
};
use super::error::ConfigError;
use crate::application::agent::{DEFAULT_MAX_DEPTH, DEFAULT_MODEL_TIMEOUT, DEFAULT_TOOL_TIMEOUT};
use crate::application::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::constants::{
    CONFIG_PATH, DEFAULT_GEMINI_ENDPOINT, DEFAULT_MODEL, DEFAULT_X_ENDPOINT, ENV_PATH,
};
use dotenvy::from_filename;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, info, warn};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    client: RawClient,
    #[serde(default)]
    agent: RawAgent,
    #[serde(default)]
    model: RawModel,
    #[serde(default)]
    social: RawSocial,
}

#[derive(Debug, Deserialize, Default)]
struct RawServer {
    bind: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawClient {
    endpoint: Option<String>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawAgent {
    max_depth: Option<u64>,
    model_timeout_secs: Option<u64>,
    tool_timeout_secs: Option<u64>,
    system_prompt: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawModel {
    endpoint: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawSocial {
    endpoint: Option<String>,
    bearer_token_env: Option<String>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration. Without an explicit path a missing
/// default file means built-in defaults; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(&expand_path(path)),
        None => match read_config(Path::new(CONFIG_PATH)) {
            Err(ConfigError::NotFound { path }) => {
                info!(path = %path.display(), "No configuration file; using defaults");
                validate_and_build(RawConfig::default())
            }
            other => other,
        },
    }
}

/// Parse configuration text that did not come from disk.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: PathBuf::from("<inline>"),
        source,
    })?;
    validate_and_build(parsed)
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let bind_text = expand_value(parsed.server.bind.as_deref().unwrap_or(DEFAULT_BIND));
    let bind: SocketAddr = bind_text
        .parse()
        .map_err(|source| ConfigError::InvalidBind {
            value: bind_text.clone(),
            source,
        })?;

    let model = parsed
        .model
        .model
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::Empty { field: "model" });
    }

    let max_depth = parsed
        .agent
        .max_depth
        .map(|depth| validate_positive("max_depth", depth))
        .transpose()?
        .map_or(DEFAULT_MAX_DEPTH, |depth| depth as usize);

    Ok(AppConfig {
        server: ServerSettings { bind },
        client: ClientSettings {
            endpoint: expand_value(
                parsed
                    .client
                    .endpoint
                    .as_deref()
                    .unwrap_or(DEFAULT_CLIENT_ENDPOINT),
            ),
            connect_timeout: seconds(
                "connect_timeout_secs",
                parsed.client.connect_timeout_secs,
                DEFAULT_CONNECT_TIMEOUT,
            )?,
            request_timeout: seconds(
                "request_timeout_secs",
                parsed.client.request_timeout_secs,
                DEFAULT_REQUEST_TIMEOUT,
            )?,
        },
        agent: AgentSettings {
            max_depth,
            model_timeout: seconds(
                "model_timeout_secs",
                parsed.agent.model_timeout_secs,
                DEFAULT_MODEL_TIMEOUT,
            )?,
            tool_timeout: seconds(
                "tool_timeout_secs",
                parsed.agent.tool_timeout_secs,
                DEFAULT_TOOL_TIMEOUT,
            )?,
            system_prompt: parsed
                .agent
                .system_prompt
                .or_else(|| Some(DEFAULT_SYSTEM_PROMPT.to_string()))
                .filter(|prompt| !prompt.trim().is_empty()),
        },
        model: ModelSettings {
            endpoint: expand_value(
                parsed
                    .model
                    .endpoint
                    .as_deref()
                    .unwrap_or(DEFAULT_GEMINI_ENDPOINT),
            ),
            model,
            api_key_env: parsed
                .model
                .api_key_env
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
        },
        social: SocialSettings {
            endpoint: expand_value(
                parsed
                    .social
                    .endpoint
                    .as_deref()
                    .unwrap_or(DEFAULT_X_ENDPOINT),
            ),
            bearer_token_env: parsed
                .social
                .bearer_token_env
                .unwrap_or_else(|| DEFAULT_BEARER_TOKEN_ENV.to_string()),
        },
    })
}

pub(super) fn validate_positive(field: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        Err(ConfigError::NotPositive { field })
    } else {
        Ok(value)
    }
}

fn seconds(
    field: &'static str,
    value: Option<u64>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(secs) => Ok(Duration::from_secs(validate_positive(field, secs)?)),
        None => Ok(default),
    }
}

/// Expands `$VAR` and `~` in a configured value, keeping it verbatim when
/// a variable is unset.
fn expand_value(raw: &str) -> String {
    shellexpand::full(raw)
        .map(|expanded| expanded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Resolves a secret through `lookup`, treating blank values as absent.
pub fn resolve_secret<F>(env_var: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let name = env_var.trim();
    if name.is_empty() {
        return None;
    }
    match lookup(name).filter(|value| !value.trim().is_empty()) {
        Some(value) => Some(value),
        None => {
            warn!(env_var = name, "Secret environment variable is not set");
            None
        }
    }
}

pub(super) fn env_secret(env_var: &str) -> Option<String> {
    ensure_env_loaded();
    resolve_secret(env_var, |name| env::var(name).ok())
}
