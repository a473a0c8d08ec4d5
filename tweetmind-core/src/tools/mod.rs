//! Built-in tools served by `tweetmind-server`.

pub mod arithmetic;
pub mod social;

use crate::application::registry::{RegistryError, ToolRegistry};
use crate::social::SocialClient;
use std::sync::Arc;
use tracing::info;

/// Registers the arithmetic demo tool, plus the post tools when a social
/// client is available.
pub fn register_builtin_tools(
    registry: &mut ToolRegistry,
    social: Option<Arc<dyn SocialClient>>,
) -> Result<(), RegistryError> {
    registry.register(arithmetic::descriptor(), arithmetic::AddTwoNumbers)?;

    match social {
        Some(client) => {
            registry.register(
                social::create_post_descriptor(),
                social::CreatePost::new(Arc::clone(&client)),
            )?;
            registry.register(
                social::delete_post_descriptor(),
                social::DeletePost::new(Arc::clone(&client)),
            )?;
            registry.register(
                social::account_info_descriptor(),
                social::GetAccountInfo::new(client),
            )?;
        }
        None => info!("No bearer token configured; post tools are disabled"),
    }

    info!(tools = registry.len(), "Built-in tools registered");
    Ok(())
}
