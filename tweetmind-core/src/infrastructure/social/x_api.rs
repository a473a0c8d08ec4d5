use super::{PostReceipt, Profile, SocialClient, SocialError};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Connectivity answers are reused for this long to stay clear of rate limits.
const CONNECTIVITY_TTL: Duration = Duration::from_secs(300);

const PROFILE_PATH: &str = "2/users/me?user.fields=public_metrics,verified,profile_image_url";

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct Deleted {
    deleted: bool,
}

#[derive(Default)]
struct Cache {
    profile: Option<Profile>,
    connectivity: Option<(Instant, bool)>,
}

/// X API v2 client authenticated with an OAuth 2.0 user-context token.
pub struct XApiClient {
    http: Client,
    endpoint: String,
    bearer_token: String,
    cache: Mutex<Cache>,
}

impl XApiClient {
    pub fn new(endpoint: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            bearer_token: bearer_token.into(),
            cache: Mutex::new(Cache::default()),
        }
    }

    fn cache(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, SocialError> {
        let mut request = self
            .http
            .request(method, self.url(path))
            .bearer_auth(&self.bearer_token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| SocialError::Network { source })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify(status, &body));
        }
        let envelope: Envelope<T> = response.json().await.map_err(|err| {
            SocialError::InvalidResponse {
                reason: err.to_string(),
            }
        })?;
        Ok(envelope.data)
    }

    async fn fetch_profile(&self) -> Result<Profile, SocialError> {
        let profile: Profile = self.send(Method::GET, PROFILE_PATH, None).await?;
        self.cache().profile = Some(profile.clone());
        Ok(profile)
    }
}

#[async_trait]
impl SocialClient for XApiClient {
    async fn post(&self, text: &str) -> Result<PostReceipt, SocialError> {
        debug!(chars = text.chars().count(), "Creating post");
        let receipt: PostReceipt = self
            .send(Method::POST, "2/tweets", Some(json!({ "text": text })))
            .await?;
        info!(post_id = %receipt.id, "Post created");
        Ok(receipt)
    }

    async fn delete_post(&self, id: &str) -> Result<(), SocialError> {
        check_post_id(id)?;
        let deleted: Deleted = self
            .send(Method::DELETE, &format!("2/tweets/{id}"), None)
            .await?;
        if deleted.deleted {
            info!(post_id = id, "Post deleted");
            Ok(())
        } else {
            Err(SocialError::InvalidResponse {
                reason: format!("post {id} was not deleted"),
            })
        }
    }

    async fn check_connectivity(&self) -> bool {
        let cached = self.cache().connectivity;
        if let Some((checked_at, connected)) = cached
            && checked_at.elapsed() < CONNECTIVITY_TTL
        {
            return connected;
        }

        let connected = match self.fetch_profile().await {
            Ok(profile) => {
                debug!(username = %profile.username, "X API connectivity confirmed");
                true
            }
            Err(err) => {
                warn!(%err, "X API connectivity check failed");
                self.cache().profile = None;
                false
            }
        };
        self.cache().connectivity = Some((Instant::now(), connected));
        connected
    }

    async fn account_info(&self) -> Result<Profile, SocialError> {
        let cached = self.cache().profile.clone();
        match cached {
            Some(profile) => Ok(profile),
            None => self.fetch_profile().await,
        }
    }
}

/// Post ids are snowflakes: ASCII digits only, so they are safe in a path.
pub(super) fn check_post_id(id: &str) -> Result<(), SocialError> {
    if id.is_empty() || !id.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(SocialError::InvalidPostId { id: id.to_string() });
    }
    Ok(())
}

/// Maps an unsuccessful X API status onto the error taxonomy.
pub(super) fn classify(status: StatusCode, body: &str) -> SocialError {
    let detail = error_detail(body);
    match status {
        StatusCode::UNAUTHORIZED => SocialError::Auth { detail },
        StatusCode::FORBIDDEN if detail.to_lowercase().contains("duplicate") => {
            SocialError::Duplicate { detail }
        }
        StatusCode::FORBIDDEN => SocialError::Permission { detail },
        StatusCode::TOO_MANY_REQUESTS => SocialError::RateLimited { detail },
        other => SocialError::Api {
            status: other.as_u16(),
            detail,
        },
    }
}

fn error_detail(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|value| {
            value
                .get("detail")
                .or_else(|| value.get("title"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
