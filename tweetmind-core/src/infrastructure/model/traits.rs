//! Model traits

use super::types::{ModelError, ModelRequest, ModelResponse};
use async_trait::async_trait;

/// Anything that can answer a conversation with content parts.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider identifier used in logs and error messages
    fn id(&self) -> &str;

    /// Generate the next model turn for `request`
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}
