//! Token store implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{AuthToken, TokenStore, AUTH_TOKEN_KEY};
use crate::error::{SyncError, SyncResult};

/// Key/value JSON file holding the credential under [`AUTH_TOKEN_KEY`].
///
/// Unrelated keys in the same file are preserved; the file is removed once
/// the last key is cleared.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed file contents. `None` when the file exists but is not a JSON
    /// object of strings, for example after an interrupted write.
    fn read_entries(&self) -> SyncResult<Option<BTreeMap<String, String>>> {
        if !self.path.exists() {
            return Ok(Some(BTreeMap::new()));
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Some(BTreeMap::new()));
        }
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(Some(entries)),
            Err(error) => {
                tracing::warn!(
                    "Ignoring unreadable token file {}: {}",
                    self.path.display(),
                    error
                );
                Ok(None)
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> SyncResult<()> {
        if entries.is_empty() {
            return self.remove_file();
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(entries)?;
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, serialized)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn remove_file(&self) -> SyncResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load_token(&self) -> SyncResult<Option<AuthToken>> {
        let Some(entries) = self.read_entries()? else {
            return Ok(None);
        };
        match entries.get(AUTH_TOKEN_KEY) {
            Some(raw) => match AuthToken::new(raw) {
                Ok(token) => Ok(Some(token)),
                Err(error) => {
                    tracing::warn!("Ignoring unusable stored token: {}", error);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn save_token(&self, token: &AuthToken) -> SyncResult<()> {
        let mut entries = self.read_entries()?.unwrap_or_default();
        entries.insert(AUTH_TOKEN_KEY.to_string(), token.expose().to_string());
        self.write_entries(&entries)
    }

    fn clear_token(&self) -> SyncResult<()> {
        match self.read_entries()? {
            None => self.remove_file(),
            Some(mut entries) => {
                if entries.remove(AUTH_TOKEN_KEY).is_some() {
                    self.write_entries(&entries)?;
                }
                Ok(())
            }
        }
    }
}

/// Process-local store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<AuthToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_token(&self) -> SyncResult<Option<AuthToken>> {
        let guard = self
            .slot
            .lock()
            .map_err(|error| SyncError::Storage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save_token(&self, token: &AuthToken) -> SyncResult<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| SyncError::Storage(error.to_string()))?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear_token(&self) -> SyncResult<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| SyncError::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}
