use crate::commands::common::{format_item_line, parse_item_id, CliContext};
use crate::error::CliError;

pub async fn run_toggle(id: &str, context: &CliContext) -> Result<(), CliError> {
    let id = parse_item_id(id)?;
    let controller = context.signed_in_controller().await?;

    let item = controller
        .toggle_complete(id)
        .await?
        .ok_or(CliError::ItemNotFound(id))?;

    println!("{}", format_item_line(&item, 1));
    Ok(())
}
