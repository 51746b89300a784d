use std::env;
use std::io::{self, IsTerminal, Read};

use tallyho_core::{HttpTodoRemote, SessionState, SyncController, TodoId, TodoItem};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::token_store::CliTokenStore;

pub type CliController = SyncController<HttpTodoRemote, CliTokenStore>;

/// Effective configuration plus the credential store it selects.
pub struct CliContext {
    pub config: CliConfig,
    pub store: CliTokenStore,
}

impl CliContext {
    pub fn load(explicit_api_url: Option<String>) -> Result<Self, CliError> {
        let config = CliConfig::load()
            .and_then(|config| config.with_overrides(explicit_api_url))
            .map_err(CliError::Config)?;
        let store = CliTokenStore::from_config(&config)?;
        Ok(Self { config, store })
    }

    pub fn controller(&self) -> Result<CliController, CliError> {
        let remote_config = self
            .config
            .remote_config()
            .map_err(CliError::Config)?
            .ok_or(CliError::NotConfigured)?;
        let remote = HttpTodoRemote::new(remote_config)?;
        Ok(SyncController::new(remote, self.store.clone()))
    }

    /// Controller restored from the stored credential with the list fetched.
    pub async fn signed_in_controller(&self) -> Result<CliController, CliError> {
        let controller = self.controller()?;
        match controller.initialize().await? {
            SessionState::LoggedOut => Err(CliError::NotSignedIn),
            SessionState::Loading | SessionState::Ready => Ok(controller),
        }
    }
}

pub fn format_item_lines(items: &[TodoItem]) -> Vec<String> {
    let width = items
        .iter()
        .map(|item| item.id.to_string().len())
        .max()
        .unwrap_or(1);
    items.iter().map(|item| format_item_line(item, width)).collect()
}

pub fn format_item_line(item: &TodoItem, id_width: usize) -> String {
    format!(
        "{:>id_width$}  {}  {}",
        item.id.get(),
        item.status_marker(),
        item_preview(&item.text, 72)
    )
}

pub fn item_preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn resolve_item_text(text_parts: &[String]) -> Result<String, CliError> {
    if let Some(text) = normalize_text(&text_parts.join(" ")) {
        return Ok(text);
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(text);
    }

    Err(CliError::EmptyText)
}

pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_item_id(id: &str) -> Result<TodoId, CliError> {
    let trimmed = id.trim().trim_start_matches('#');
    if trimmed.is_empty() {
        return Err(CliError::EmptyItemId);
    }
    trimmed
        .parse::<TodoId>()
        .map_err(|_| CliError::InvalidItemId(trimmed.to_string()))
}

/// Credential from `--credential`, then `TALLYHO_CREDENTIAL`, then piped stdin.
pub fn resolve_credential(explicit: Option<String>) -> Result<String, CliError> {
    if let Some(credential) = explicit.as_deref().and_then(normalize_text) {
        return Ok(credential);
    }

    if let Some(credential) = env::var("TALLYHO_CREDENTIAL")
        .ok()
        .as_deref()
        .and_then(normalize_text)
    {
        return Ok(credential);
    }

    read_piped_stdin()?.ok_or(CliError::MissingCredential)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text(&buffer))
}
