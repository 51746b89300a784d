//! Persistent CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tallyho_core::config::{normalize_api_base_url, normalize_text_option, RemoteConfig};

const CONFIG_FILE_NAME: &str = "cli-config.json";
const TOKEN_FILE_NAME: &str = "storage.json";

/// Where the auth token is persisted between runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// JSON file in the user data directory
    #[default]
    File,
    /// OS keyring
    Keyring,
}

impl TokenStoreKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keyring" => Some(Self::Keyring),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyring => "keyring",
            Self::File => "file",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub token_store: Option<TokenStoreKind>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    if let Some(path) = normalize_text_option(std::env::var("TALLYHO_CONFIG").ok()) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("tallyho").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn default_token_file_path() -> Result<PathBuf, String> {
    dirs::data_dir()
        .map(|dir| dir.join("tallyho").join(TOKEN_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI data directory".to_string())
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self {
                version: default_config_version(),
                ..Self::default()
            });
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Apply `TALLYHO_API_URL` / `TALLYHO_TOKEN_STORE`, then an explicit
    /// `--api-url`, on top of the file values.
    pub fn with_overrides(mut self, explicit_api_url: Option<String>) -> Result<Self, String> {
        if let Some(url) = normalize_text_option(std::env::var("TALLYHO_API_URL").ok()) {
            self.api_base_url = Some(url);
        }
        if let Some(raw) = normalize_text_option(std::env::var("TALLYHO_TOKEN_STORE").ok()) {
            let kind = TokenStoreKind::parse(&raw).ok_or_else(|| {
                format!("TALLYHO_TOKEN_STORE must be 'keyring' or 'file', got '{raw}'")
            })?;
            self.token_store = Some(kind);
        }
        if let Some(url) = normalize_text_option(explicit_api_url) {
            self.api_base_url = Some(url);
        }
        self.normalize();
        Ok(self)
    }

    pub fn token_store_kind(&self) -> TokenStoreKind {
        self.token_store.unwrap_or_default()
    }

    /// Remote settings, or `None` when no API URL is configured.
    pub fn remote_config(&self) -> Result<Option<RemoteConfig>, String> {
        let Some(url) = self.api_base_url.as_deref() else {
            return Ok(None);
        };
        let mut config = RemoteConfig::new(url).map_err(|error| error.to_string())?;
        if let Some(secs) = self.timeout_secs.filter(|secs| *secs > 0) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(Some(config))
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_text_option(self.api_base_url.take()).map(|url| {
            normalize_api_base_url(&url).unwrap_or(url)
        });
        if self.timeout_secs == Some(0) {
            self.timeout_secs = None;
        }
    }
}
