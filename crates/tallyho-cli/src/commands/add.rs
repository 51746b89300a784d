use crate::commands::common::{format_item_line, resolve_item_text, CliContext};
use crate::error::CliError;

pub async fn run_add(text_parts: &[String], context: &CliContext) -> Result<(), CliError> {
    let text = resolve_item_text(text_parts)?;

    let controller = context.signed_in_controller().await?;
    let item = controller.add(&text).await?.ok_or(CliError::NotSignedIn)?;

    println!("{}", format_item_line(&item, 1));
    Ok(())
}
