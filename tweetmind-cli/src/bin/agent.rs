//! Interactive agent entry point
//!
//! Connects to a running tool server, discovers its tools and chats over
//! stdin/stdout with a Gemini model that may call them.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{BufReader, stdin, stdout};
use tracing::{error, info, warn};
use tweetmind_cli::cli::AgentArgs;
use tweetmind_cli::init_tracing;
use tweetmind_cli::repl::run_repl;
use tweetmind_core::AppConfig;
use tweetmind_core::agent::Agent;
use tweetmind_core::client::McpClient;
use tweetmind_core::model::GeminiClient;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = AgentArgs::parse();

    init_tracing();

    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply(args.overrides())?;

    let endpoint = config.client.endpoint.clone();
    info!(%endpoint, "Connecting to tool server");
    let client = match McpClient::connect(&endpoint, config.client_options()).await {
        Ok(client) => client,
        Err(err) => {
            error!(%err, "Connection failed");
            eprintln!("{}", err.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    let discovered = match client.discover_tools().await {
        Ok(discovered) => discovered,
        Err(err) => {
            error!(%err, "Tool discovery failed");
            eprintln!("{}", err.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(tools = discovered.declarations.len(), "Tools discovered");

    let api_key = config.api_key();
    if api_key.is_none() {
        warn!(env = %config.model.api_key_env, "No Gemini API key set; requests will fail");
    }
    let provider = GeminiClient::new(config.model.endpoint.clone(), api_key);

    let mut agent = Agent::new(
        Arc::new(provider),
        Arc::new(client),
        discovered.declarations,
        config.agent_options(),
    );

    println!("Connected. Type a message, or 'exit' to quit.");
    run_repl(&mut agent, BufReader::new(stdin()), stdout()).await?;
    Ok(ExitCode::SUCCESS)
}
