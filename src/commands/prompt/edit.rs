use console::style;
use dialoguer::Editor;

use super::locate;
use crate::api::{HubResult, PromptHub, PromptUpdate};

/// Edit a prompt's content in `$EDITOR`.
pub fn run(hub: &PromptHub, reference: &str, file: &str) -> HubResult<()> {
    let prompt = locate(hub, reference, file)?;

    let edited = Editor::new().edit(&prompt.content)?;
    let content = match edited {
        Some(content) if content != prompt.content => content,
        _ => {
            println!("{}", style("No changes detected. Nothing to save.").yellow());
            return Ok(());
        }
    };

    let updated = hub.prompts().update_prompt(
        &prompt.id,
        PromptUpdate {
            content: Some(content),
            ..Default::default()
        },
    )?;
    println!(
        "{} Prompt '{}' updated ({} bytes)",
        style("✔").green().bold(),
        updated.file_path,
        updated.size
    );
    Ok(())
}
