//! # Agent Module
//!
//! Drives one conversation: the model is called with the full history and
//! the discovered tool declarations, each requested tool call is executed
//! through a [`ToolGateway`](crate::application::gateway::ToolGateway) and
//! folded back in, until the model answers in plain text.
//!
//! ## Key Types
//!
//! - [`Agent`] - The conversation owner and loop
//! - [`AgentOptions`] - Model, depth bound and timeouts
//! - [`AgentError`] - Why an input ended without an answer

mod directive;
mod errors;
mod models;
mod parser;
mod runner;

pub use directive::AgentDirective;
pub use errors::AgentError;
pub use models::{AgentOptions, DEFAULT_MAX_DEPTH, DEFAULT_MODEL_TIMEOUT, DEFAULT_TOOL_TIMEOUT};
pub use runner::Agent;
