use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};

use super::locate;
use crate::api::{HubResult, PromptHub};

pub fn run(hub: &PromptHub, reference: &str, file: &str) -> HubResult<()> {
    let prompt = locate(hub, reference, file)?;

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Delete prompt '{}'?", prompt.file_path))
        .default(false)
        .interact()?;
    if !confirmed {
        println!("{}", style("Aborted").yellow());
        return Ok(());
    }

    hub.prompts().delete_prompt(&prompt.id)?;
    println!("{} Prompt '{}' deleted", style("•").green().bold(), prompt.file_path);
    Ok(())
}
