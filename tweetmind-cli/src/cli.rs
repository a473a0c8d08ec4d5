use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tweetmind_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "tweetmind-server",
    version,
    about = "Serves TweetMind tools over an SSE session transport"
)]
pub struct ServerArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Bind address (overrides [server] bind)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

impl ServerArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind: self.bind,
            ..ConfigOverrides::default()
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "tweetmind",
    version,
    about = "Chat with a Gemini agent that can call TweetMind tools"
)]
pub struct AgentArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SSE endpoint of the tool server (overrides [client] endpoint)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Gemini model name (overrides [model] model)
    #[arg(long)]
    pub model: Option<String>,

    /// Tool calls allowed per input (overrides [agent] max_depth)
    #[arg(long)]
    pub max_depth: Option<usize>,
}

impl AgentArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind: None,
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            max_depth: self.max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_flags_become_overrides() {
        let args = AgentArgs::parse_from([
            "tweetmind",
            "--endpoint",
            "http://localhost:4000/sse",
            "--max-depth",
            "2",
        ]);
        let overrides = args.overrides();
        assert_eq!(overrides.endpoint.as_deref(), Some("http://localhost:4000/sse"));
        assert_eq!(overrides.max_depth, Some(2));
        assert!(overrides.model.is_none());
    }

    #[test]
    fn server_bind_flag_is_parsed() {
        let args = ServerArgs::parse_from(["tweetmind-server", "--bind", "0.0.0.0:3001"]);
        assert_eq!(args.overrides().bind.map(|addr| addr.port()), Some(3001));
        assert!(args.config.is_none());
    }
}
