//! Remote API configuration.

use std::time::Duration;

use url::{Host, Url};

use crate::error::{SyncError, SyncResult};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the remote to-do collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    base_url: String,
    timeout: Duration,
}

impl RemoteConfig {
    /// Validate an `http(s)` base URL; trailing slashes are stripped.
    pub fn new(base_url: impl AsRef<str>) -> SyncResult<Self> {
        Ok(Self {
            base_url: normalize_api_base_url(base_url.as_ref())?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the API lives on this machine (local dev servers).
    pub fn is_loopback(&self) -> bool {
        Url::parse(&self.base_url)
            .ok()
            .and_then(|url| match url.host()? {
                Host::Domain(domain) => Some(domain.eq_ignore_ascii_case("localhost")),
                Host::Ipv4(addr) => Some(addr.is_loopback()),
                Host::Ipv6(addr) => Some(addr.is_loopback()),
            })
            .unwrap_or(false)
    }

    /// URL of the collection resource.
    pub fn collection_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    /// URL of a single item resource.
    pub fn item_url(&self, id: crate::TodoId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

pub fn normalize_api_base_url(value: &str) -> SyncResult<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SyncError::Configuration(
            "API base URL must not be empty".to_string(),
        ));
    }
    let parsed = Url::parse(trimmed)
        .map_err(|error| SyncError::Configuration(format!("Invalid API base URL: {error}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SyncError::Configuration(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(SyncError::Configuration(
            "API base URL must not carry a query or fragment".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Normalize optional text by trimming whitespace and removing empties.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
