use console::style;
use std::fs;
use std::path::Path;

use super::super::resolve;
use crate::api::models::RepositoryBundle;
use crate::api::{HubResult, PromptHub};
use crate::cli::ExportFormat;

/// Write a repository and its prompts to `out`.
pub fn run(hub: &PromptHub, reference: &str, out: &Path, format: ExportFormat) -> HubResult<()> {
    let repo = resolve(hub, reference)?;
    let prompts = hub.prompts().list_prompts(&repo.id)?;
    let bundle = RepositoryBundle {
        repository: repo,
        prompts,
    };

    let serialized = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&bundle)?,
        ExportFormat::Yaml => serde_yaml::to_string(&bundle)?,
    };
    fs::write(out, serialized)?;

    println!(
        "{} exported {} prompt(s) to {}",
        style("•").green().bold(),
        bundle.prompts.len(),
        out.display()
    );
    Ok(())
}
