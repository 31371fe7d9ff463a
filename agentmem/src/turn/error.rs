use thiserror::Error;

use crate::capability::AuthError;
use crate::error::AgentError;
use crate::memory::StoreError;

/// Why a turn aborted.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("user id must not be empty")]
    InvalidUserId,
    #[error("memory store error: {0}")]
    Store(#[from] StoreError),
    #[error("model error: {0}")]
    Model(#[from] AgentError),
    #[error("authorization failed for tool {tool}")]
    AuthorizationFailed { tool: String },
    #[error("authorization error: {0}")]
    Auth(#[from] AuthError),
    #[error("turn cancelled")]
    Cancelled,
}

impl TurnError {
    /// Plain text suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            TurnError::InvalidUserId => {
                "A user identity is required to continue this conversation.".to_string()
            }
            TurnError::Store(_) => {
                "Your saved memories could not be accessed right now. Please try again.".to_string()
            }
            TurnError::Model(_) => {
                "The assistant could not finish its response. Please try again.".to_string()
            }
            TurnError::AuthorizationFailed { tool } => {
                format!("Authorization for {} was not granted, so the tool was not run.", tool)
            }
            TurnError::Auth(_) => {
                "Authorization could not be completed. Please try again.".to_string()
            }
            TurnError::Cancelled => "The request was cancelled.".to_string(),
        }
    }
}
