use crate::commands::common::{parse_item_id, CliContext};
use crate::error::CliError;

pub async fn run_delete(id: &str, context: &CliContext) -> Result<(), CliError> {
    let id = parse_item_id(id)?;
    let controller = context.signed_in_controller().await?;

    if !controller.delete(id).await? {
        return Err(CliError::NotSignedIn);
    }

    println!("{id}");
    Ok(())
}
