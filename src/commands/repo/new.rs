use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::api::models::{category_slug, CATEGORIES, MAX_TAGS};
use crate::api::{CreateRepositoryData, HubResult, License, PromptHub};
use crate::core::utils::split_tags;

/// Create a new repository interactively.
pub fn run(hub: &PromptHub) -> HubResult<()> {
    let theme = ColorfulTheme::default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("Repository name")
        .interact_text()?;
    let description: String = Input::with_theme(&theme)
        .with_prompt("Description (optional)")
        .allow_empty(true)
        .interact_text()?;

    let category_idx = Select::with_theme(&theme)
        .with_prompt("Category")
        .default(0)
        .items(CATEGORIES)
        .interact()?;

    let licenses: Vec<&str> = License::ALL.iter().map(|l| l.label()).collect();
    let license_idx = Select::with_theme(&theme)
        .with_prompt("License")
        .default(0)
        .items(&licenses)
        .interact()?;

    let tags_line: String = Input::with_theme(&theme)
        .with_prompt(format!("Tags (comma‑separated, up to {})", MAX_TAGS))
        .allow_empty(true)
        .interact_text()?;

    let is_private = Confirm::with_theme(&theme)
        .with_prompt("Make this repository private?")
        .default(false)
        .interact()?;

    let repo = hub.store().create_repository(CreateRepositoryData {
        name,
        description,
        is_private,
        tags: split_tags(&tags_line),
        license: License::ALL[license_idx].label().to_string(),
        category: category_slug(CATEGORIES[category_idx]),
    })?;

    println!(
        "{} Repository {} created",
        style("•").green().bold(),
        style(repo.full_name()).yellow()
    );
    Ok(())
}
