//! Credential persistence for the CLI: OS keyring or a JSON file.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use tallyho_core::auth::{FileTokenStore, AUTH_TOKEN_KEY};
use tallyho_core::{AuthToken, SyncError, SyncResult, TokenStore};

use crate::config::{default_token_file_path, CliConfig, TokenStoreKind};
use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "tallyho";

#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    username: String,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self {
            username: AUTH_TOKEN_KEY.to_string(),
        }
    }
}

impl KeyringTokenStore {
    #[cfg(test)]
    fn with_username(username: &str) -> Self {
        Self {
            username: username.to_string(),
        }
    }

    /// Stored values that are not a usable credential read as signed out.
    fn parse_stored(raw: &str) -> Option<AuthToken> {
        match AuthToken::new(raw) {
            Ok(token) => Some(token),
            Err(error) => {
                tracing::warn!("Ignoring unusable keyring credential: {}", error);
                None
            }
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> SyncResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| SyncError::Storage(error.to_string()))
    }
}

impl TokenStore for KeyringTokenStore {
    #[cfg(not(test))]
    fn load_token(&self) -> SyncResult<Option<AuthToken>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Self::parse_stored(&raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(SyncError::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_token(&self) -> SyncResult<Option<AuthToken>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| SyncError::Storage(error.to_string()))?;
        Ok(guard
            .get(&self.username)
            .and_then(|raw| Self::parse_stored(raw)))
    }

    #[cfg(not(test))]
    fn save_token(&self, token: &AuthToken) -> SyncResult<()> {
        self.entry()?
            .set_password(token.expose())
            .map_err(|error| SyncError::Storage(error.to_string()))
    }

    #[cfg(test)]
    fn save_token(&self, token: &AuthToken) -> SyncResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| SyncError::Storage(error.to_string()))?;
        guard.insert(self.username.clone(), token.expose().to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_token(&self) -> SyncResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(SyncError::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_token(&self) -> SyncResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| SyncError::Storage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Store selected by configuration.
#[derive(Debug, Clone)]
pub enum CliTokenStore {
    Keyring(KeyringTokenStore),
    File(FileTokenStore),
}

impl CliTokenStore {
    pub fn from_config(config: &CliConfig) -> Result<Self, CliError> {
        match config.token_store_kind() {
            TokenStoreKind::Keyring => Ok(Self::Keyring(KeyringTokenStore::default())),
            TokenStoreKind::File => {
                let path = default_token_file_path().map_err(CliError::Config)?;
                Ok(Self::File(FileTokenStore::new(path)))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Keyring(_) => "OS keyring".to_string(),
            Self::File(store) => store.path().display().to_string(),
        }
    }
}

impl TokenStore for CliTokenStore {
    fn load_token(&self) -> SyncResult<Option<AuthToken>> {
        match self {
            Self::Keyring(store) => store.load_token(),
            Self::File(store) => store.load_token(),
        }
    }

    fn save_token(&self, token: &AuthToken) -> SyncResult<()> {
        match self {
            Self::Keyring(store) => store.save_token(token),
            Self::File(store) => store.save_token(token),
        }
    }

    fn clear_token(&self) -> SyncResult<()> {
        match self {
            Self::Keyring(store) => store.clear_token(),
            Self::File(store) => store.clear_token(),
        }
    }
}
