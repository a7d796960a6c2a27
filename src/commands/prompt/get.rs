use console::style;

use super::locate;
use crate::api::{HubResult, PromptHub};

/// Display a prompt.
pub fn run(hub: &PromptHub, reference: &str, file: &str) -> HubResult<()> {
    let prompt = locate(hub, reference, file)?;

    println!("{} {}", style("Name:").green().bold(), prompt.name);
    if !prompt.description.is_empty() {
        println!("{} {}", style("Description:").green().bold(), prompt.description);
    }
    println!("{}", style("Content:").green().bold());
    println!("{}", prompt.content);
    Ok(())
}
