//! Tool server entry point
//!
//! Registers the built-in tools and serves them over the SSE transport.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};
use tweetmind_cli::cli::ServerArgs;
use tweetmind_cli::init_tracing;
use tweetmind_core::AppConfig;
use tweetmind_core::registry::ToolRegistry;
use tweetmind_core::server;
use tweetmind_core::social::{SocialClient, XApiClient};
use tweetmind_core::tools::register_builtin_tools;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = ServerArgs::parse();

    init_tracing();
    info!("Starting TweetMind tool server");

    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply(args.overrides())?;
    debug!(bind = %config.server.bind, "Configuration loaded");

    let social: Option<Arc<dyn SocialClient>> = config.bearer_token().map(|token| {
        Arc::new(XApiClient::new(config.social.endpoint.clone(), token)) as Arc<dyn SocialClient>
    });

    let mut registry = ToolRegistry::new();
    register_builtin_tools(&mut registry, social)?;

    server::serve(Arc::new(registry), config.server.bind).await?;
    Ok(())
}
