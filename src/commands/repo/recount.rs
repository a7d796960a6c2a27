use console::style;

use super::super::resolve;
use crate::api::{HubResult, PromptHub};

/// Reset a repository's star count from its star rows.
pub fn run(hub: &PromptHub, reference: &str) -> HubResult<()> {
    let repo = resolve(hub, reference)?;
    hub.repositories().repair_star_count(&repo.id)?;
    let repaired = hub.repositories().find_by_id(&repo.id)?;
    println!(
        "{} {} now has {} star(s)",
        style("•").green().bold(),
        style(repaired.full_name()).yellow(),
        repaired.stars_count
    );
    Ok(())
}
