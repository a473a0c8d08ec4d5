pub const DEFAULT_BIND: &str = "127.0.0.1:3001";
pub const DEFAULT_CLIENT_ENDPOINT: &str = "http://127.0.0.1:3001/sse";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_BEARER_TOKEN_ENV: &str = "X_BEARER_TOKEN";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are TweetMind, an assistant that can post to X on the user's behalf. \
Use the available tools when they help, and answer briefly once you have what you need.";
