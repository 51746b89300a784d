use tallyho_core::{SessionState, TokenStore};

use crate::cli::AuthCommands;
use crate::commands::common::{resolve_credential, CliContext};
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, context: &CliContext) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { credential } => {
            let credential = resolve_credential(credential)?;
            let controller = context.controller()?;
            let state = controller.login(&credential).await?;
            let count = controller.items().len();
            println!(
                "Signed in ({}); {} to-do item{} ({})",
                context.store.describe(),
                count,
                if count == 1 { "" } else { "s" },
                state.label()
            );
            Ok(())
        }
        AuthCommands::Status { verify } => {
            if !verify {
                let signed_in = context.store.load_token()?.is_some();
                if signed_in {
                    println!("Signed in (credential stored in {})", context.store.describe());
                } else {
                    println!("Not signed in.");
                }
                return Ok(());
            }

            let controller = context.controller()?;
            match controller.initialize().await? {
                SessionState::LoggedOut => println!("Not signed in."),
                state => println!(
                    "Signed in; server accepted the credential ({} items, {})",
                    controller.items().len(),
                    state.label()
                ),
            }
            Ok(())
        }
        AuthCommands::Logout => {
            // Logout never touches the network, so no API URL is required.
            match context.controller() {
                Ok(controller) => controller.logout()?,
                Err(CliError::NotConfigured) => context.store.clear_token()?,
                Err(error) => return Err(error),
            }
            println!("Signed out");
            Ok(())
        }
    }
}

