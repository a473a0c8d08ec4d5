//! Social posting collaborator used by the post tools.

mod error;
mod x_api;

pub use error::SocialError;
pub use x_api::XApiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub public_metrics: PublicMetrics,
}

/// Each call is independent, so callers may retry any of them.
#[async_trait]
pub trait SocialClient: Send + Sync {
    async fn post(&self, text: &str) -> Result<PostReceipt, SocialError>;

    async fn delete_post(&self, id: &str) -> Result<(), SocialError>;

    /// Whether the credentials currently work. Answers may be cached.
    async fn check_connectivity(&self) -> bool;

    async fn account_info(&self) -> Result<Profile, SocialError>;
}
