//! Client-side filtering and ordering of loaded repositories.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use super::error::HubError;
use super::models::{category_slug, Repository};

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Relevance,
    Stars,
    Forks,
    Updated,
    Created,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Relevance,
        SortOrder::Stars,
        SortOrder::Forks,
        SortOrder::Updated,
        SortOrder::Created,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Stars => "stars",
            SortOrder::Forks => "forks",
            SortOrder::Updated => "updated",
            SortOrder::Created => "created",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                HubError::Validation(format!(
                    "Unknown sort order '{}' (expected relevance, stars, forks, updated or created)",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    /// `None` or `"all"` disables the category filter.
    pub category: Option<String>,
    pub sort: SortOrder,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Case-insensitive substring match over name, description and tags.
pub fn matches(repo: &Repository, text: &str) -> bool {
    relevance(repo, &text.trim().to_lowercase()).is_some()
}

fn relevance(repo: &Repository, needle: &str) -> Option<u8> {
    if needle.is_empty() {
        return Some(0);
    }
    if repo.name.to_lowercase().contains(needle) {
        Some(3)
    } else if repo.tags.iter().any(|t| t.to_lowercase().contains(needle)) {
        Some(2)
    } else if repo.description.to_lowercase().contains(needle) {
        Some(1)
    } else {
        None
    }
}

/// Filters `repos` by the query and orders the hits.
pub fn search(repos: &[Repository], query: &SearchQuery) -> Vec<Repository> {
    let needle = query.text.trim().to_lowercase();
    let category = query
        .category
        .as_deref()
        .map(category_slug)
        .filter(|c| !c.is_empty() && c != "all");

    let mut hits: Vec<(u8, &Repository)> = repos
        .iter()
        .filter(|r| category.as_deref().map_or(true, |c| r.category == c))
        .filter_map(|r| relevance(r, &needle).map(|score| (score, r)))
        .collect();

    match query.sort {
        SortOrder::Relevance => hits.sort_by_key(|(score, _)| Reverse(*score)),
        SortOrder::Stars => hits.sort_by_key(|(_, r)| Reverse(r.stars_count)),
        SortOrder::Forks => hits.sort_by_key(|(_, r)| Reverse(r.forks_count)),
        SortOrder::Updated => hits.sort_by_key(|(_, r)| Reverse(r.updated_at)),
        SortOrder::Created => hits.sort_by_key(|(_, r)| Reverse(r.created_at)),
    }

    hits.into_iter().map(|(_, r)| r.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn repo(name: &str, description: &str, tags: &[&str], category: &str, stars: i64) -> Repository {
        let now = Utc::now();
        Repository {
            id: name.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            owner_id: "u1".into(),
            owner_username: "ada".into(),
            owner_email: "ada@example.com".into(),
            is_private: false,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            license: "MIT License".into(),
            category: category.into(),
            stars_count: stars,
            forks_count: 0,
            forked_from: None,
            created_at: now - Duration::minutes(stars),
            updated_at: now,
            is_starred: None,
        }
    }

    fn fixtures() -> Vec<Repository> {
        vec![
            repo("outreach", "Cold email sequences", &["sales"], "sales", 2),
            repo("release-notes", "Changelog writer", &["email", "dev"], "development", 9),
            repo("email-kit", "Templates", &[], "content-creation", 5),
        ]
    }

    fn names(repos: &[Repository]) -> Vec<&str> {
        repos.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn matches_name_tag_or_description() {
        let repos = fixtures();
        assert!(matches(&repos[0], "COLD"));
        assert!(matches(&repos[1], "Dev"));
        assert!(matches(&repos[2], "kit"));
        assert!(matches(&repos[2], ""));
        assert!(!matches(&repos[2], "changelog"));
    }

    #[test]
    fn relevance_prefers_name_then_tag_then_description() {
        let hits = search(&fixtures(), &SearchQuery::text("email"));
        assert_eq!(names(&hits), vec!["email-kit", "release-notes", "outreach"]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(search(&fixtures(), &SearchQuery::text("kubernetes")).is_empty());
    }

    #[test]
    fn category_filter_and_sorting() {
        let query = SearchQuery {
            text: String::new(),
            category: Some("all".into()),
            sort: SortOrder::Stars,
        };
        assert_eq!(
            names(&search(&fixtures(), &query)),
            vec!["release-notes", "email-kit", "outreach"]
        );

        let query = SearchQuery {
            category: Some("sales".into()),
            ..query
        };
        assert_eq!(names(&search(&fixtures(), &query)), vec!["outreach"]);

        for category in ["content-creation", "Content Creation"] {
            let query = SearchQuery {
                category: Some(category.into()),
                ..query.clone()
            };
            assert_eq!(names(&search(&fixtures(), &query)), vec!["email-kit"]);
        }
    }

    #[test]
    fn sort_orders_parse() {
        assert_eq!("Forks".parse::<SortOrder>().unwrap(), SortOrder::Forks);
        assert!("popularity".parse::<SortOrder>().is_err());
    }
}
