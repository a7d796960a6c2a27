use console::style;
use std::collections::HashMap;

use crate::api::{HubResult, PromptHub};

/// Display statistics about the public repositories.
pub fn run(hub: &PromptHub) -> HubResult<()> {
    let store = hub.store();
    store.refresh()?;
    let stats = store.stats();

    println!("{}", style("PromptHub Statistics").bold().underlined());
    println!(
        "{}: {}",
        style("Total Repositories").cyan(),
        style(stats.total_repos).yellow()
    );
    println!(
        "{}: {}",
        style("Total Tags").cyan(),
        style(stats.total_tags).yellow()
    );
    println!(
        "{}: {}",
        style("Contributors").cyan(),
        style(stats.total_contributors).yellow()
    );

    let mut tag_counts: HashMap<String, usize> = HashMap::new();
    for repo in store.repositories() {
        for tag in repo.tags {
            *tag_counts.entry(tag).or_insert(0) += 1;
        }
    }
    if !tag_counts.is_empty() {
        let mut sorted_tags: Vec<_> = tag_counts.into_iter().collect();
        sorted_tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        println!("\n{}", style("Top Tags:").bold().underlined());
        for (tag, count) in sorted_tags.iter().take(10) {
            println!("  - {} ({})", style(tag).green(), count);
        }
    }

    Ok(())
}
