use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("authentication failed: {detail}")]
    Auth { detail: String },
    #[error("permission denied: {detail}")]
    Permission { detail: String },
    #[error("duplicate post: {detail}")]
    Duplicate { detail: String },
    #[error("rate limited: {detail}")]
    RateLimited { detail: String },
    #[error("X API returned {status}: {detail}")]
    Api { status: u16, detail: String },
    #[error("network error talking to X API: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    #[error("X API returned an unexpected payload: {reason}")]
    InvalidResponse { reason: String },
    #[error("'{id}' is not a post id")]
    InvalidPostId { id: String },
}

impl SocialError {
    /// Corrective message handed back to the model as the tool result.
    pub fn user_message(&self) -> String {
        match self {
            SocialError::Auth { detail } => format!(
                "Authentication failed. Please check the X API bearer token. Error: {detail}"
            ),
            SocialError::Permission { detail } => format!(
                "Permission denied. The X app needs 'Read and write' permissions; change them in the developer portal and regenerate the access token. Error: {detail}"
            ),
            SocialError::Duplicate { detail } => format!(
                "Duplicate post detected. X does not allow posting the same content twice. Error: {detail}"
            ),
            SocialError::RateLimited { detail } => {
                format!("Rate limited by X. Wait a few minutes before trying again. Error: {detail}")
            }
            SocialError::Api { status, detail } => {
                format!("X API request failed with status {status}: {detail}")
            }
            SocialError::Network { source } => format!("Could not reach the X API: {source}"),
            SocialError::InvalidResponse { reason } => {
                format!("The X API answered with something unexpected: {reason}")
            }
            SocialError::InvalidPostId { id } => {
                format!("'{id}' is not a valid post id. Post ids are numeric, e.g. 1445880548472328192.")
            }
        }
    }
}
