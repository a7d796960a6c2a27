use console::style;
use dialoguer::{theme::ColorfulTheme, Editor, Input};

use super::super::resolve;
use crate::api::{CreatePromptData, HubError, HubResult, PromptHub};
use crate::core::template;

/// Add a markdown prompt to a repository.
pub fn run(hub: &PromptHub, reference: &str) -> HubResult<()> {
    let repo = resolve(hub, reference)?;
    let theme = ColorfulTheme::default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("Prompt name")
        .interact_text()?;
    let description: String = Input::with_theme(&theme)
        .with_prompt("Description (optional)")
        .allow_empty(true)
        .interact_text()?;
    let content = Editor::new()
        .edit("Enter your prompt content here. Use {{ variable }} for placeholders.")?
        .ok_or_else(|| HubError::Validation("Prompt creation aborted".to_string()))?;

    let description = Some(description.as_str()).filter(|d| !d.trim().is_empty());
    let prompt = hub
        .prompts()
        .create_prompt(&repo.id, CreatePromptData::markdown(&name, &content, description))?;

    println!(
        "{} Prompt {} added to {}",
        style("•").green().bold(),
        style(&prompt.file_path).yellow(),
        repo.full_name()
    );
    let vars = template::variables(&prompt.content);
    if !vars.is_empty() {
        println!("  {} {}", style("Variables:").cyan(), vars.join(", "));
    }
    Ok(())
}
