use console::style;

use super::print_repository_line;
use crate::api::{HubResult, PromptHub, SearchQuery, SortOrder};

/// Search repositories by name, tag or description.
pub fn run(hub: &PromptHub, query: &str, category: Option<&str>, sort: &str) -> HubResult<()> {
    let sort: SortOrder = sort.parse()?;
    let store = hub.store();
    store.refresh()?;

    let hits = store.search(&SearchQuery {
        text: query.to_string(),
        category: category.map(str::to_string),
        sort,
    });

    if hits.is_empty() {
        println!("{}", style("No match").yellow());
    } else {
        println!("{}", style("Matches:").green().bold());
        for repo in &hits {
            print_repository_line(repo);
        }
    }
    Ok(())
}
