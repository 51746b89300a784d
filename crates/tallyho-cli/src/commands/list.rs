use crate::commands::common::{format_item_lines, CliContext};
use crate::error::CliError;

pub async fn run_list(as_json: bool, context: &CliContext) -> Result<(), CliError> {
    let controller = context.signed_in_controller().await?;
    let items = controller.items();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("Nothing to do.");
    } else {
        for line in format_item_lines(&items) {
            println!("{line}");
        }
    }

    Ok(())
}
