//! Error types for tallyho-core

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias using tallyho-core's error
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while syncing with the remote collection
#[derive(Error, Debug)]
pub enum SyncError {
    /// Transport failure or an unreadable response body
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response that is not an authorization failure
    #[error("Server error: {message}")]
    Server { status: StatusCode, message: String },

    /// 401/403 from the remote; forces a logout
    #[error("Not authorized ({status}); signed out")]
    Unauthorized { status: StatusCode },

    /// Credential from the identity provider was unusable
    #[error("Invalid credential: {0}")]
    InvalidCredential(&'static str),

    /// Durable token storage failed
    #[error("Token storage error: {0}")]
    Storage(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl SyncError {
    /// Classify a non-success status into `Unauthorized` or `Server`.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        if is_auth_status(status) {
            Self::Unauthorized { status }
        } else {
            Self::Server { status, message }
        }
    }

    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<std::io::Error> for SyncError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(error: serde_json::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

pub fn is_auth_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}
