//! Application constants
//!
//! Single source of truth for paths, protocol identifiers and limits.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/tweetmind.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// MCP protocol revision spoken by both halves
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported by the server during `initialize`
pub const SERVER_NAME: &str = "tweetmind-server";

/// Path of the stream-opening endpoint
pub const SSE_PATH: &str = "/sse";

/// Path of the addressed message endpoint
pub const MESSAGES_PATH: &str = "/messages";

/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

/// Default Gemini endpoint
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default X API endpoint
pub const DEFAULT_X_ENDPOINT: &str = "https://api.twitter.com";

/// Maximum length of a single post
pub const MAX_POST_CHARS: usize = 280;
