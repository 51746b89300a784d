//! Auth token model and durable token persistence.

mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

pub use store::{FileTokenStore, MemoryTokenStore};

/// Storage key under which the credential is persisted.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Opaque bearer credential issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Accept a credential string, trimming surrounding whitespace.
    pub fn new(credential: impl AsRef<str>) -> SyncResult<Self> {
        let trimmed = credential.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SyncError::InvalidCredential("credential must not be empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(SyncError::InvalidCredential(
                "credential must not contain whitespace",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Raw credential for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("AuthToken").field(&"[REDACTED]").finish()
    }
}

/// Durable storage for the auth token, read once at startup.
pub trait TokenStore: Send + Sync + 'static {
    fn load_token(&self) -> SyncResult<Option<AuthToken>>;
    fn save_token(&self, token: &AuthToken) -> SyncResult<()>;
    fn clear_token(&self) -> SyncResult<()>;
}
