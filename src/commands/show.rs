use console::style;

use super::resolve;
use crate::api::models::category_label;
use crate::api::{HubResult, PromptHub};
use crate::core::template;

/// Display a repository and its prompts.
pub fn run(hub: &PromptHub, reference: &str) -> HubResult<()> {
    let repo = resolve(hub, reference)?;
    let prompts = hub.prompts().list_prompts(&repo.id)?;

    println!("{}", style(repo.full_name()).bold().underlined());
    if !repo.description.is_empty() {
        println!("{}", repo.description);
    }
    println!(
        "{}: {}   {}: {}   {}: {}",
        style("Stars").cyan(),
        style(repo.stars_count).yellow(),
        style("Forks").cyan(),
        style(repo.forks_count).yellow(),
        style("Visibility").cyan(),
        if repo.is_private { "private" } else { "public" }
    );
    println!("{}: {}", style("License").cyan(), repo.license);
    println!("{}: {}", style("Category").cyan(), category_label(&repo.category));
    if !repo.tags.is_empty() {
        println!("{}: {}", style("Tags").cyan(), repo.tags.join(", "));
    }
    if let Some(source) = &repo.forked_from {
        println!("{}: {}", style("Forked from").cyan(), source);
    }
    if repo.is_starred == Some(true) {
        println!("{}", style("★ You starred this repository").yellow());
    }
    println!(
        "{}: {}",
        style("Updated").cyan(),
        repo.updated_at.format("%Y-%m-%d %H:%M")
    );

    println!();
    if prompts.is_empty() {
        println!("{}", style("No prompts in this repository").dim());
        return Ok(());
    }
    println!("{}", style("Prompts:").green().bold());
    for prompt in &prompts {
        let vars = template::variables(&prompt.content);
        let vars = if vars.is_empty() {
            String::new()
        } else {
            style(format!(" [{}]", vars.join(", "))).dim().to_string()
        };
        println!(
            "  {} {} ({} bytes){}",
            style("•").green(),
            style(&prompt.file_path).yellow(),
            prompt.size,
            vars
        );
        if !prompt.description.is_empty() {
            println!("      {}", prompt.description);
        }
    }
    Ok(())
}
