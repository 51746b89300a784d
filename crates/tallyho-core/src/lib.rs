//! tallyho-core - Core library for Tallyho
//!
//! This crate contains the shared models, the remote to-do API client, token
//! persistence, and the sync controller that keeps a local list consistent
//! with the server.

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod remote;

pub use auth::{AuthToken, TokenStore};
pub use controller::{SessionState, SyncController, SyncSnapshot};
pub use error::{SyncError, SyncResult};
pub use models::{TodoId, TodoItem};
pub use remote::{HttpTodoRemote, TodoRemote};
