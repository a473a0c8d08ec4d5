use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {endpoint}: {message}")]
    Connection { endpoint: String, message: String },
    #[error("tool discovery failed: {message}")]
    Discovery { message: String },
}

impl ClientError {
    pub(super) fn connection(endpoint: &str, message: impl Into<String>) -> Self {
        Self::Connection {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    pub(super) fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery {
            message: message.into(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ClientError::Connection { endpoint, .. } => {
                format!("Could not connect to the tool server at {endpoint}. Is it running?")
            }
            ClientError::Discovery { message } => {
                format!("Connected, but the tool list could not be loaded: {message}")
            }
        }
    }
}
