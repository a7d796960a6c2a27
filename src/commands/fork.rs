use console::style;

use super::resolve;
use crate::api::{HubResult, PromptHub};

/// Fork a repository into the signed-in account.
pub fn run(hub: &PromptHub, reference: &str) -> HubResult<()> {
    let source = resolve(hub, reference)?;
    let fork = hub.store().fork(&source.id)?;
    println!(
        "{} Forked {} to {}",
        style("•").green().bold(),
        style(source.full_name()).yellow(),
        style(fork.full_name()).yellow()
    );
    Ok(())
}
