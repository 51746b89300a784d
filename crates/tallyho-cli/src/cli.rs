use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::TokenStoreKind;

#[derive(Parser)]
#[command(name = "tallyho")]
#[command(about = "Keep your to-do list in sync from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// To-do API base URL (e.g. <https://api.example.com/v1>)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Quick add: tallyho "buy milk"
    #[arg(trailing_var_arg = true)]
    pub text: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a to-do
    #[command(alias = "new")]
    Add {
        /// To-do text
        text: Vec<String>,
    },
    /// List to-dos in server order
    #[command(alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip the completion flag of a to-do
    #[command(alias = "done")]
    Toggle {
        /// To-do ID
        id: String,
    },
    /// Delete a to-do
    #[command(alias = "rm")]
    Delete {
        /// To-do ID
        id: String,
    },
    /// Manage the stored credential
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store a credential issued by the identity provider and fetch the list
    Login {
        /// Credential string (falls back to TALLYHO_CREDENTIAL or stdin)
        #[arg(long, value_name = "TOKEN")]
        credential: Option<String>,
    },
    /// Show whether a credential is stored
    Status {
        /// Check the stored credential against the server
        #[arg(long)]
        verify: bool,
    },
    /// Forget the stored credential
    Logout,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create or update the config file (pass the API URL with --api-url)
    Init {
        /// Where to persist the credential
        #[arg(long, value_enum)]
        token_store: Option<TokenStoreKind>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },
    /// Print the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
