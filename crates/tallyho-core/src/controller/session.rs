//! Session state owned by the sync controller.

use serde::Serialize;

use crate::auth::AuthToken;
use crate::models::TodoItem;

/// Observable session state, derived from token presence and the loading
/// flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    LoggedOut,
    Loading,
    Ready,
}

impl SessionState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LoggedOut => "signed out",
            Self::Loading => "loading",
            Self::Ready => "ready",
        }
    }
}

/// Point-in-time copy of the controller state for renderers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncSnapshot {
    pub state: SessionState,
    pub items: Vec<TodoItem>,
    pub loading: bool,
    pub authenticated: bool,
}

/// Credential and session epoch captured when a request is issued.
#[derive(Debug)]
pub(super) struct Ticket {
    pub token: AuthToken,
    pub epoch: u64,
    pub tracks_loading: bool,
}

#[derive(Debug, Default)]
pub(super) struct ControllerState {
    pub items: Vec<TodoItem>,
    pub token: Option<AuthToken>,
    pending_loads: usize,
    epoch: u64,
}

impl ControllerState {
    pub const fn loading(&self) -> bool {
        self.pending_loads > 0
    }

    pub const fn session_state(&self) -> SessionState {
        if self.token.is_none() {
            SessionState::LoggedOut
        } else if self.loading() {
            SessionState::Loading
        } else {
            SessionState::Ready
        }
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            state: self.session_state(),
            items: self.items.clone(),
            loading: self.loading(),
            authenticated: self.token.is_some(),
        }
    }

    /// Start a new session with `token`, dropping everything from the old one.
    pub fn begin_session(&mut self, token: Option<AuthToken>) {
        self.token = token;
        self.items.clear();
        self.pending_loads = 0;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Capture what a request needs; `None` when signed out.
    pub fn ticket(&mut self, tracks_loading: bool) -> Option<Ticket> {
        let token = self.token.clone()?;
        if tracks_loading {
            self.pending_loads += 1;
        }
        Some(Ticket {
            token,
            epoch: self.epoch,
            tracks_loading,
        })
    }

    /// Retire a ticket. Returns `false` when the session it belonged to has
    /// ended, in which case the response must be discarded.
    pub fn settle(&mut self, ticket: &Ticket) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        if ticket.tracks_loading {
            self.pending_loads = self.pending_loads.saturating_sub(1);
        }
        true
    }
}
