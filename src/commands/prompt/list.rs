use console::style;

use super::super::resolve;
use crate::api::{HubResult, PromptHub};

pub fn run(hub: &PromptHub, reference: &str) -> HubResult<()> {
    let repo = resolve(hub, reference)?;
    let prompts = hub.prompts().list_prompts(&repo.id)?;

    if prompts.is_empty() {
        println!("{}", style("No prompts in this repository").green().bold());
        return Ok(());
    }
    println!("{}", style(format!("Prompts in {}:", repo.full_name())).green().bold());
    for prompt in prompts {
        println!(
            "  {} {} - {} ({} bytes)",
            style("•").green(),
            style(&prompt.file_path).yellow(),
            prompt.name,
            prompt.size
        );
    }
    Ok(())
}
