//! # Tool Registry
//!
//! Holds the invocable tools and dispatches validated calls to their
//! handlers. Handler failures, including panics, are folded into a
//! [`ToolResult`] with `is_error` set; only addressing and validation
//! problems come back as [`InvocationError`].

mod handler;

pub use handler::{FnHandler, ToolHandler, UpstreamError, handler_fn};

use crate::domain::schema::ValidationError;
use crate::domain::tool::{ToolDescriptor, ToolResult};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
    #[error("invalid arguments for tool '{tool}': {source}")]
    Validation {
        tool: String,
        #[source]
        source: ValidationError,
    },
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, descriptor: ToolDescriptor, handler: H) -> Result<(), RegistryError>
    where
        H: ToolHandler + 'static,
    {
        let name = descriptor.name().to_string();
        if self.index.contains_key(&name) {
            warn!(tool = %name, "Rejecting duplicate tool registration");
            return Err(RegistryError::DuplicateTool(name));
        }
        debug!(tool = %name, "Registering tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Snapshot of every descriptor in registration order.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| tool.descriptor.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub async fn invoke(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolResult, InvocationError> {
        let Some(tool) = self.index.get(name).and_then(|&slot| self.tools.get(slot)) else {
            warn!(tool = name, "Unknown tool requested");
            return Err(InvocationError::UnknownTool(name.to_string()));
        };

        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        tool.descriptor
            .input_schema()
            .validate(&arguments)
            .map_err(|source| {
                debug!(tool = name, %source, "Tool arguments failed validation");
                InvocationError::Validation {
                    tool: name.to_string(),
                    source,
                }
            })?;

        debug!(tool = name, "Dispatching tool call to handler");
        let handler = Arc::clone(&tool.handler);
        let outcome = AssertUnwindSafe(handler.call(arguments))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(failure)) => {
                warn!(tool = name, %failure, "Tool handler reported an upstream failure");
                ToolResult::error(format!("Error: {failure}"))
            }
            Err(panic) => {
                let reason = panic_reason(panic.as_ref());
                error!(tool = name, reason = %reason, "Tool handler panicked");
                ToolResult::error(format!("Error: tool '{name}' failed unexpectedly: {reason}"))
            }
        };

        info!(tool = name, is_error = result.is_error, "Tool executed");
        Ok(result)
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
