use console::style;

use super::print_repository_line;
use crate::api::{HubResult, PromptHub};

/// List every public repository, newest first.
pub fn run(hub: &PromptHub) -> HubResult<()> {
    let store = hub.store();
    store.refresh()?;
    let repos = store.repositories();

    if repos.is_empty() {
        println!("{}", style("No repositories yet").green().bold());
        return Ok(());
    }

    println!("{}", style("Repositories:").green().bold());
    for repo in &repos {
        print_repository_line(repo);
    }
    Ok(())
}
