use crate::application::registry::{ToolHandler, UpstreamError};
use crate::constants::MAX_POST_CHARS;
use crate::domain::schema::{Parameters, Schema};
use crate::domain::tool::{ToolDescriptor, ToolResult};
use crate::social::SocialClient;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub fn create_post_descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "createPost",
        "Create a post on X formerly known as Twitter",
        Parameters::new().required("status", Schema::string().described("Text of the post")),
    )
}

pub fn delete_post_descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "deletePost",
        "Delete one of the account's posts on X by id",
        Parameters::new().required("id", Schema::string().described("Id of the post to delete")),
    )
}

pub fn account_info_descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        "getAccountInfo",
        "Show the X account the server posts as",
        Parameters::new(),
    )
}

/// Rejects posts X would refuse before spending an API call on them.
pub fn check_post_text(status: &str) -> Result<(), UpstreamError> {
    if status.trim().is_empty() {
        return Err(UpstreamError::new("post text is empty"));
    }
    let length = status.chars().count();
    if length > MAX_POST_CHARS {
        return Err(UpstreamError::new(format!(
            "post is {length} characters; the limit is {MAX_POST_CHARS}"
        )));
    }
    Ok(())
}

fn string_argument<'a>(arguments: &'a Value, field: &str) -> Result<&'a str, UpstreamError> {
    arguments
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| UpstreamError::new(format!("'{field}' is not a string")))
}

pub struct CreatePost {
    client: Arc<dyn SocialClient>,
}

impl CreatePost {
    pub fn new(client: Arc<dyn SocialClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for CreatePost {
    async fn call(&self, arguments: Value) -> Result<ToolResult, UpstreamError> {
        let status = string_argument(&arguments, "status")?;
        check_post_text(status)?;

        if !self.client.check_connectivity().await {
            return Err(UpstreamError::new(
                "not connected to X. Check the bearer token and app permissions",
            ));
        }
        let receipt = self
            .client
            .post(status)
            .await
            .map_err(|err| UpstreamError::new(err.user_message()))?;
        Ok(ToolResult::text(format!(
            "Successfully posted: \"{status}\". Post ID: {}",
            receipt.id
        )))
    }
}

pub struct DeletePost {
    client: Arc<dyn SocialClient>,
}

impl DeletePost {
    pub fn new(client: Arc<dyn SocialClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for DeletePost {
    async fn call(&self, arguments: Value) -> Result<ToolResult, UpstreamError> {
        let id = string_argument(&arguments, "id")?;
        self.client
            .delete_post(id)
            .await
            .map_err(|err| UpstreamError::new(err.user_message()))?;
        Ok(ToolResult::text(format!("Deleted post {id}")))
    }
}

pub struct GetAccountInfo {
    client: Arc<dyn SocialClient>,
}

impl GetAccountInfo {
    pub fn new(client: Arc<dyn SocialClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolHandler for GetAccountInfo {
    async fn call(&self, _arguments: Value) -> Result<ToolResult, UpstreamError> {
        let profile = self
            .client
            .account_info()
            .await
            .map_err(|err| UpstreamError::new(err.user_message()))?;
        let text = serde_json::to_string_pretty(&profile)
            .map_err(|err| UpstreamError::new(err.to_string()))?;
        Ok(ToolResult::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::{PostReceipt, Profile, PublicMetrics, SocialError};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSocial {
        posted: Mutex<Vec<String>>,
        duplicate: bool,
    }

    #[async_trait]
    impl SocialClient for FakeSocial {
        async fn post(&self, text: &str) -> Result<PostReceipt, SocialError> {
            if self.duplicate {
                return Err(SocialError::Duplicate {
                    detail: "duplicate content".into(),
                });
            }
            self.posted.lock().expect("lock").push(text.to_string());
            Ok(PostReceipt { id: "42".into() })
        }

        async fn delete_post(&self, _id: &str) -> Result<(), SocialError> {
            Ok(())
        }

        async fn check_connectivity(&self) -> bool {
            true
        }

        async fn account_info(&self) -> Result<Profile, SocialError> {
            Ok(Profile {
                id: "1".into(),
                name: "Tweet Mind".into(),
                username: "tweetmind".into(),
                verified: false,
                profile_image_url: None,
                public_metrics: PublicMetrics {
                    followers_count: 12,
                    following_count: 3,
                    tweet_count: 40,
                },
            })
        }
    }

    #[test]
    fn post_text_limits() {
        assert!(check_post_text("hello").is_ok());
        assert!(check_post_text("   ").is_err());
        assert!(check_post_text(&"x".repeat(MAX_POST_CHARS)).is_ok());
        assert!(check_post_text(&"x".repeat(MAX_POST_CHARS + 1)).is_err());
    }

    #[tokio::test]
    async fn create_post_reports_the_id() {
        let social = Arc::new(FakeSocial::default());
        let tool = CreatePost::new(social.clone());
        let result = tool
            .call(json!({"status": "hello world"}))
            .await
            .expect("posted");
        assert_eq!(
            result.text_content(),
            "Successfully posted: \"hello world\". Post ID: 42"
        );
        assert_eq!(*social.posted.lock().expect("lock"), vec!["hello world"]);
    }

    #[tokio::test]
    async fn overlong_post_never_reaches_the_client() {
        let social = Arc::new(FakeSocial::default());
        let tool = CreatePost::new(social.clone());
        let err = tool
            .call(json!({"status": "x".repeat(MAX_POST_CHARS + 1)}))
            .await
            .unwrap_err();
        assert!(err.message().contains("limit"));
        assert!(social.posted.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn duplicate_post_becomes_upstream_error() {
        let social = Arc::new(FakeSocial {
            duplicate: true,
            ..Default::default()
        });
        let err = CreatePost::new(social)
            .call(json!({"status": "again"}))
            .await
            .unwrap_err();
        assert!(err.message().contains("Duplicate post"));
    }

    #[tokio::test]
    async fn account_info_is_json_text() {
        let result = GetAccountInfo::new(Arc::new(FakeSocial::default()))
            .call(json!({}))
            .await
            .expect("profile");
        let profile: Value = serde_json::from_str(&result.text_content()).expect("json");
        assert_eq!(profile["username"], json!("tweetmind"));
        assert_eq!(profile["public_metrics"]["followers_count"], json!(12));
    }
}
