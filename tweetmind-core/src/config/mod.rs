//! Configuration
//!
//! `config/tweetmind.toml` is read into raw serde structs and validated
//! into [`AppConfig`]. Secrets are never stored in the file; it names the
//! environment variables that hold them.

pub mod app;
pub mod defaults;
pub mod error;
pub mod loader;

pub use app::{
    AgentSettings, AppConfig, ClientSettings, ConfigOverrides, ModelSettings, ServerSettings,
    SocialSettings,
};
pub use error::ConfigError;
pub use loader::{ensure_env_loaded, load_config, parse_config, resolve_secret};
