use std::io;

use tallyho_core::TodoId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Sync(#[from] tallyho_core::SyncError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No to-do text provided")]
    EmptyText,
    #[error("To-do ID cannot be empty")]
    EmptyItemId,
    #[error("Invalid to-do ID '{0}': expected a number")]
    InvalidItemId(String),
    #[error("To-do not found: {0}")]
    ItemNotFound(TodoId),
    #[error("No credential provided. Pass --credential, set TALLYHO_CREDENTIAL, or pipe it on stdin.")]
    MissingCredential,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("API URL is not configured. Run `tallyho config init --api-url <URL>` or set TALLYHO_API_URL.")]
    NotConfigured,
    #[error("Not signed in. Run `tallyho auth login` first.")]
    NotSignedIn,
}
