use console::style;

use super::locate;
use crate::api::{HubResult, PromptHub};
use crate::core::template;
use crate::core::utils::parse_vars;

/// Render a template prompt with variables and print it to stdout.
pub fn run(hub: &PromptHub, reference: &str, file: &str, vars: &[String]) -> HubResult<()> {
    let prompt = locate(hub, reference, file)?;
    let map = parse_vars(vars);

    let missing: Vec<String> = template::variables(&prompt.content)
        .into_iter()
        .filter(|v| !map.contains_key(v))
        .collect();
    if !missing.is_empty() {
        eprintln!(
            "{} unset variables render empty: {}",
            style("•").yellow().bold(),
            missing.join(", ")
        );
    }

    println!("{}", template::render(&prompt.content, &map));
    Ok(())
}
