use console::style;

use super::resolve;
use crate::api::{HubResult, PromptHub};

pub fn star(hub: &PromptHub, reference: &str) -> HubResult<()> {
    let repo = resolve(hub, reference)?;
    hub.store().star(&repo.id)?;
    println!(
        "{} Starred {}",
        style("•").green().bold(),
        style(repo.full_name()).yellow()
    );
    Ok(())
}

pub fn unstar(hub: &PromptHub, reference: &str) -> HubResult<()> {
    let repo = resolve(hub, reference)?;
    hub.store().unstar(&repo.id)?;
    println!(
        "{} Unstarred {}",
        style("•").green().bold(),
        style(repo.full_name()).yellow()
    );
    Ok(())
}
