//! Remote to-do collection.
//!
//! The server owns identity and ordering; clients only see these four
//! operations, each authenticated with the bearer credential.

mod http;

use async_trait::async_trait;

use crate::auth::AuthToken;
use crate::error::SyncResult;
use crate::models::{TodoId, TodoItem};

pub use http::HttpTodoRemote;

#[async_trait]
pub trait TodoRemote: Send + Sync {
    /// Fetch the full collection in server order.
    async fn list(&self, token: &AuthToken) -> SyncResult<Vec<TodoItem>>;

    /// Create an item; the server assigns its id.
    async fn create(&self, token: &AuthToken, text: &str) -> SyncResult<TodoItem>;

    /// Set the completion flag and return the stored item.
    async fn update(&self, token: &AuthToken, id: TodoId, completed: bool)
        -> SyncResult<TodoItem>;

    async fn delete(&self, token: &AuthToken, id: TodoId) -> SyncResult<()>;
}
