//! # Application Module
//!
//! Core application logic on both sides of the transport.
//!
//! ## Submodules
//!
//! - [`registry`] - Server-side tool registry and handler contract
//! - [`transport`] - Session transport manager keyed by session id
//! - [`service`] - MCP JSON-RPC message handler bound to a registry
//! - [`gateway`] - The seam through which the agent invokes tools
//! - [`client`] - Protocol client that opens a session and calls tools
//! - [`agent`] - Agent loop alternating model calls and tool calls

pub mod agent;
pub mod client;
pub mod gateway;
pub mod registry;
pub mod service;
pub mod transport;
