//! Tallyho CLI - a to-do list that stays in sync with your account
//!
//! Every data command restores the stored credential, fetches the list from
//! the server, and then applies one change.

mod cli;
mod commands;
mod config;
mod error;
mod token_store;

#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::CliContext;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::list::run_list;
use crate::commands::toggle::run_toggle;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api_url = cli.api_url;

    match cli.command {
        Some(Commands::Completions { shell, output }) => run_completions(shell, output.as_deref()),
        Some(Commands::Config { command }) => run_config(command, api_url),
        Some(Commands::Add { text }) => run_add(&text, &CliContext::load(api_url)?).await,
        Some(Commands::List { json }) => run_list(json, &CliContext::load(api_url)?).await,
        Some(Commands::Toggle { id }) => run_toggle(&id, &CliContext::load(api_url)?).await,
        Some(Commands::Delete { id }) => run_delete(&id, &CliContext::load(api_url)?).await,
        Some(Commands::Auth { command }) => run_auth(command, &CliContext::load(api_url)?).await,
        None => {
            // Quick add: tallyho "buy milk"
            if cli.text.is_empty() {
                Cli::command().print_help()?;
                println!();
                Ok(())
            } else {
                run_add(&cli.text, &CliContext::load(api_url)?).await
            }
        }
    }
}
