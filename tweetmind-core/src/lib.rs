//! # TweetMind core
//!
//! Server and client halves of a tool-calling agent that talks over a
//! session-addressed SSE transport.
//!
//! - [`registry`] holds tool descriptors and dispatches validated calls
//! - [`transport`] maps session ids to open event streams
//! - [`service`] answers MCP JSON-RPC messages on top of the registry
//! - [`client`] opens a session, discovers tools and invokes them remotely
//! - [`agent`] drives a conversation between the model and the tools
//! - [`gateway`] is the seam the agent calls tools through

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod tools;

pub use application::{agent, client, gateway, registry, service, transport};
pub use config::AppConfig;
pub use domain::{schema, tool, types};
pub use infrastructure::{model, rpc, server, social};
