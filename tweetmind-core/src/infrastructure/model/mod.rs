//! Model layer
//!
//! The agent only depends on [`ModelProvider`]; [`GeminiClient`] is the
//! shipped implementation.

pub mod clients;
pub mod traits;
pub mod types;

pub use clients::GeminiClient;
pub use traits::ModelProvider;
pub use types::{ModelError, ModelRequest, ModelResponse};
