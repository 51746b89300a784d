//! Sync controller: the single owner of the local to-do list and credential.
//!
//! Every user action goes through one method here. Remote calls run without
//! holding the state lock, so overlapping operations are allowed and their
//! results are applied in completion order. Nothing is changed locally until
//! the server has answered.
//!
//! State transitions:
//!
//! ```text
//! LoggedOut --login--> Loading --fetch ok--> Ready
//! Ready --add/toggle/delete ok--> Ready
//! Loading | Ready --401/403--> LoggedOut
//! Loading | Ready --logout--> LoggedOut
//! ```

mod session;

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::auth::{AuthToken, TokenStore};
use crate::error::{SyncError, SyncResult};
use crate::models::{TodoId, TodoItem};
use crate::remote::TodoRemote;

pub use session::{SessionState, SyncSnapshot};
use session::{ControllerState, Ticket};

pub struct SyncController<R, S> {
    remote: R,
    store: S,
    state: Mutex<ControllerState>,
}

impl<R: TodoRemote, S: TokenStore> SyncController<R, S> {
    /// Create a signed-out controller. Call [`Self::initialize`] to restore
    /// a persisted credential.
    pub fn new(remote: R, store: S) -> Self {
        Self {
            remote,
            store,
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Read the persisted token and, when present, fetch the collection.
    pub async fn initialize(&self) -> SyncResult<SessionState> {
        let Some(token) = self.store.load_token()? else {
            tracing::info!("No stored credential; starting signed out");
            self.lock().begin_session(None);
            return Ok(SessionState::LoggedOut);
        };

        tracing::debug!("Restored stored credential");
        self.lock().begin_session(Some(token));
        self.refresh().await
    }

    /// Store a credential from the identity provider and fetch immediately.
    pub async fn login(&self, credential: &str) -> SyncResult<SessionState> {
        let token = AuthToken::new(credential)?;
        self.store.save_token(&token)?;
        self.lock().begin_session(Some(token));
        tracing::info!("Signed in; fetching to-do list");
        self.refresh().await
    }

    /// Clear the credential and the local list. Responses to requests
    /// issued before this call are discarded when they arrive.
    pub fn logout(&self) -> SyncResult<()> {
        self.lock().begin_session(None);
        tracing::info!("Signed out");
        self.store.clear_token()
    }

    /// Replace the local list with the server's collection, in server order.
    pub async fn refresh(&self) -> SyncResult<SessionState> {
        let Some(ticket) = self.lock().ticket(true) else {
            return Ok(SessionState::LoggedOut);
        };

        match self.remote.list(&ticket.token).await {
            Ok(items) => {
                let mut state = self.lock();
                if state.settle(&ticket) {
                    tracing::info!("Fetched {} to-do items", items.len());
                    state.items = items;
                } else {
                    tracing::debug!("Discarding list response from an ended session");
                }
                Ok(state.session_state())
            }
            Err(error) => Err(self.fail(&ticket, "fetch", error)),
        }
    }

    /// Create an item and append the server's copy. `Ok(None)` when signed
    /// out or when the session ended while the request was in flight.
    pub async fn add(&self, text: &str) -> SyncResult<Option<TodoItem>> {
        let Some(ticket) = self.lock().ticket(true) else {
            tracing::debug!("Ignoring add while signed out");
            return Ok(None);
        };

        match self.remote.create(&ticket.token, text).await {
            Ok(item) => {
                let mut state = self.lock();
                if !state.settle(&ticket) {
                    tracing::debug!("Discarding created item {} from an ended session", item.id);
                    return Ok(None);
                }
                state.items.push(item.clone());
                Ok(Some(item))
            }
            Err(error) => Err(self.fail(&ticket, "add", error)),
        }
    }

    /// Ask the server to flip completion of `id` and swap in its answer,
    /// keeping the item's position. `Ok(None)` when signed out, when `id` is
    /// not in the local list, when the item is gone by the time the response
    /// arrives, or when the server answers for a different id.
    pub async fn toggle_complete(&self, id: TodoId) -> SyncResult<Option<TodoItem>> {
        let (ticket, completed) = {
            let mut state = self.lock();
            let Some(completed) = state
                .items
                .iter()
                .find(|item| item.id == id)
                .map(TodoItem::toggled_completion)
            else {
                return Ok(None);
            };
            let Some(ticket) = state.ticket(false) else {
                return Ok(None);
            };
            (ticket, completed)
        };

        match self.remote.update(&ticket.token, id, completed).await {
            Ok(updated) => {
                let mut state = self.lock();
                if !state.settle(&ticket) {
                    tracing::debug!("Discarding update for {} from an ended session", id);
                    return Ok(None);
                }
                if updated.id != id {
                    tracing::warn!("Ignoring update reply for {} to a toggle of {}", updated.id, id);
                    return Ok(None);
                }
                let Some(slot) = state.items.iter_mut().find(|item| item.id == id) else {
                    tracing::debug!("Item {} was removed before its update landed", id);
                    return Ok(None);
                };
                *slot = updated.clone();
                Ok(Some(updated))
            }
            Err(error) => Err(self.fail(&ticket, "toggle", error)),
        }
    }

    /// Delete `id` remotely, then drop it locally if still present.
    /// `Ok(false)` when signed out or the session ended mid-flight.
    pub async fn delete(&self, id: TodoId) -> SyncResult<bool> {
        let Some(ticket) = self.lock().ticket(false) else {
            tracing::debug!("Ignoring delete while signed out");
            return Ok(false);
        };

        match self.remote.delete(&ticket.token, id).await {
            Ok(()) => {
                let mut state = self.lock();
                if !state.settle(&ticket) {
                    return Ok(false);
                }
                state.items.retain(|item| item.id != id);
                Ok(true)
            }
            Err(error) => Err(self.fail(&ticket, "delete", error)),
        }
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        self.lock().snapshot()
    }

    pub fn items(&self) -> Vec<TodoItem> {
        self.lock().items.clone()
    }

    pub fn state(&self) -> SessionState {
        self.lock().session_state()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().token.is_some()
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Settle a failed request. Auth failures end the session; everything
    /// else leaves the list as it was.
    fn fail(&self, ticket: &Ticket, operation: &str, error: SyncError) -> SyncError {
        tracing::warn!("{} failed: {}", operation, error);

        let forced_logout = {
            let mut state = self.lock();
            let current = state.settle(ticket);
            if current && error.is_auth_failure() {
                state.begin_session(None);
                true
            } else {
                false
            }
        };

        if forced_logout {
            tracing::warn!("Credential rejected; signing out");
            if let Err(clear_error) = self.store.clear_token() {
                tracing::warn!("Failed to clear stored credential: {}", clear_error);
            }
        }
        error
    }
}
