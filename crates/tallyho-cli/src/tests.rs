use clap::{CommandFactory, Parser};
use pretty_assertions::assert_eq;
use tallyho_core::auth::FileTokenStore;
use tallyho_core::{AuthToken, SyncError, TodoId, TodoItem, TokenStore};

use crate::cli::{AuthCommands, Cli, Commands, CompletionShell, ConfigCommands};
use crate::commands::common::{
    format_item_lines, item_preview, normalize_text, parse_item_id, resolve_credential,
    CliContext,
};
use crate::commands::completions::render_completions;
use crate::commands::config::{apply_init, config_report, format_config_lines};
use crate::config::{CliConfig, TokenStoreKind};
use crate::error::CliError;
use crate::token_store::CliTokenStore;

fn item(id: i64, text: &str, completed: bool) -> TodoItem {
    TodoItem {
        id: TodoId::from_raw(id),
        text: text.to_string(),
        completed,
    }
}

fn file_context(dir: &tempfile::TempDir, api_url: Option<&str>) -> CliContext {
    CliContext {
        config: CliConfig {
            version: 1,
            api_base_url: api_url.map(str::to_string),
            token_store: Some(TokenStoreKind::File),
            timeout_secs: Some(2),
        },
        store: CliTokenStore::File(FileTokenStore::new(dir.path().join("storage.json"))),
    }
}

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn quick_add_collects_trailing_text() {
    let cli = Cli::try_parse_from(["tallyho", "buy", "milk"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.text, vec!["buy".to_string(), "milk".to_string()]);
}

#[test]
fn subcommands_parse_ids_and_flags() {
    let cli = Cli::try_parse_from(["tallyho", "toggle", "3"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Toggle { ref id }) if id == "3"));

    let cli = Cli::try_parse_from(["tallyho", "list", "--json"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::List { json: true })));

    let cli = Cli::try_parse_from(["tallyho", "auth", "login", "--credential", "abc"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Auth {
            command: AuthCommands::Login { credential: Some(ref value) }
        }) if value == "abc"
    ));
}

#[test]
fn config_init_accepts_global_api_url() {
    let cli = Cli::try_parse_from([
        "tallyho",
        "config",
        "init",
        "--api-url",
        "https://api.example.com/v1",
        "--token-store",
        "keyring",
    ])
    .unwrap();
    assert_eq!(cli.api_url.as_deref(), Some("https://api.example.com/v1"));
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Init {
                token_store: Some(TokenStoreKind::Keyring),
                timeout_secs: None,
            }
        })
    ));
}

#[test]
fn normalize_text_trims_and_rejects_empty() {
    assert_eq!(normalize_text("  buy milk  "), Some("buy milk".to_string()));
    assert_eq!(normalize_text(" \n\t "), None);
}

#[test]
fn parse_item_id_accepts_hash_prefix() {
    assert_eq!(parse_item_id(" #12 ").unwrap(), TodoId::from_raw(12));
    assert!(matches!(parse_item_id("  "), Err(CliError::EmptyItemId)));
    assert!(matches!(
        parse_item_id("abc"),
        Err(CliError::InvalidItemId(value)) if value == "abc"
    ));
}

#[test]
fn item_preview_truncates_with_ellipsis() {
    let preview = item_preview("This is a very long sentence that should be shortened", 20);
    assert_eq!(preview, "This is a very lo...");
    assert_eq!(item_preview("multi\nline   text", 40), "multi line text");
}

#[test]
fn format_item_lines_align_ids_and_markers() {
    let lines = format_item_lines(&[item(1, "a", true), item(12, "b", false)]);
    assert_eq!(lines, vec![" 1  [x]  a".to_string(), "12  [ ]  b".to_string()]);
}

#[test]
fn explicit_credential_wins() {
    let credential = resolve_credential(Some("  from-flag ".to_string())).unwrap();
    assert_eq!(credential, "from-flag");
}

#[test]
fn apply_init_validates_values() {
    let mut config = CliConfig::default();
    apply_init(
        &mut config,
        Some("https://api.example.com/v1/".to_string()),
        Some(TokenStoreKind::File),
        Some(5),
    )
    .unwrap();
    assert_eq!(config.version, 1);
    assert_eq!(
        config.api_base_url.as_deref(),
        Some("https://api.example.com/v1")
    );
    assert_eq!(config.timeout_secs, Some(5));

    let bad_url = apply_init(&mut config, Some("example.com".to_string()), None, None);
    assert!(matches!(
        bad_url,
        Err(CliError::Sync(SyncError::Configuration(_)))
    ));

    let zero_timeout = apply_init(&mut config, None, None, Some(0));
    assert!(matches!(zero_timeout, Err(CliError::Config(_))));
}

#[test]
fn config_lines_show_unset_url() {
    let config = CliConfig {
        token_store: Some(TokenStoreKind::Keyring),
        ..CliConfig::default()
    };
    let report = config_report(&config).unwrap();
    let lines = format_config_lines(&report);
    assert_eq!(lines[0], "api_base_url   (not set)");
    assert_eq!(lines[1], "token_store    keyring (OS keyring)");
    assert_eq!(lines[2], "timeout_secs   10");
}

#[test]
fn completions_mention_binary_name() {
    let rendered = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(rendered.contains("tallyho"));
}

#[test]
fn controller_requires_api_url() {
    let dir = tempfile::tempdir().unwrap();
    let context = file_context(&dir, None);
    assert!(matches!(context.controller(), Err(CliError::NotConfigured)));
}

#[tokio::test(flavor = "current_thread")]
async fn data_commands_require_stored_credential() {
    let dir = tempfile::tempdir().unwrap();
    let context = file_context(&dir, Some("http://127.0.0.1:9"));

    let result = context.signed_in_controller().await;
    assert!(matches!(result, Err(CliError::NotSignedIn)));
}

#[tokio::test(flavor = "current_thread")]
async fn unreachable_server_keeps_credential() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let url = format!("http://{addr}");
    let context = file_context(&dir, Some(&url));
    context
        .store
        .save_token(&AuthToken::new("stored-credential").unwrap())
        .unwrap();

    let result = context.signed_in_controller().await;
    assert!(matches!(
        result,
        Err(CliError::Sync(SyncError::Network(_)))
    ));
    assert!(context.store.load_token().unwrap().is_some());
}
