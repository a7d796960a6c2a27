//! Client-facing data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::HubError;
use crate::backend::{Profile, Prompt, RepositoryRecord};

pub const MAX_TAGS: usize = 8;
pub const DEFAULT_CATEGORY: &str = "general";

/// Categories offered when creating a repository.
pub const CATEGORIES: &[&str] = &[
    "Copywriting",
    "Development",
    "Marketing",
    "Content Creation",
    "Data Analysis",
    "Automation",
    "Customer Support",
    "Sales",
    "Education",
    "Research",
    "Creative Writing",
];

/// Stored form of a category label: lowercase words joined by `-`.
pub fn category_slug(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Display label for a stored slug; unknown slugs are shown as-is.
pub fn category_label(slug: &str) -> String {
    CATEGORIES
        .iter()
        .find(|label| category_slug(label) == slug)
        .map_or_else(|| slug.to_string(), |label| label.to_string())
}

/// A repository joined with its owner's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub owner_username: String,
    pub owner_email: String,
    pub is_private: bool,
    pub tags: Vec<String>,
    pub license: String,
    pub category: String,
    pub stars_count: i64,
    pub forks_count: i64,
    pub forked_from: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Only known when a user is signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_starred: Option<bool>,
}

impl Repository {
    pub fn from_record(record: RepositoryRecord, owner: &Profile, is_starred: Option<bool>) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            owner_id: record.owner_id,
            owner_username: owner.username.clone(),
            owner_email: owner.email.clone(),
            is_private: record.is_private,
            tags: record.tags,
            license: record.license,
            category: record.category,
            stars_count: record.stars_count,
            forks_count: record.forks_count,
            forked_from: record.forked_from,
            created_at: record.created_at,
            updated_at: record.updated_at,
            is_starred,
        }
    }

    /// The `owner/name` route of the repository.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner_username, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum License {
    #[default]
    Mit,
    Apache2,
    Gpl3,
    Bsd3Clause,
    Unlicense,
}

impl License {
    pub const ALL: [License; 5] = [
        License::Mit,
        License::Apache2,
        License::Gpl3,
        License::Bsd3Clause,
        License::Unlicense,
    ];

    pub fn key(self) -> &'static str {
        match self {
            License::Mit => "mit",
            License::Apache2 => "apache-2.0",
            License::Gpl3 => "gpl-3.0",
            License::Bsd3Clause => "bsd-3-clause",
            License::Unlicense => "unlicense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            License::Mit => "MIT License",
            License::Apache2 => "Apache License 2.0",
            License::Gpl3 => "GNU General Public License v3.0",
            License::Bsd3Clause => "BSD 3-Clause License",
            License::Unlicense => "The Unlicense",
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for License {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        License::ALL
            .into_iter()
            .find(|l| l.key().eq_ignore_ascii_case(s) || l.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| HubError::Validation(format!("Unknown license '{}'", s)))
    }
}

/// Input for creating a repository.
#[derive(Debug, Clone, Default)]
pub struct CreateRepositoryData {
    pub name: String,
    pub description: String,
    pub is_private: bool,
    pub tags: Vec<String>,
    pub license: String,
    pub category: String,
}

impl CreateRepositoryData {
    /// Trims fields, normalizes tags and applies default license and category.
    pub fn normalized(self) -> Result<Self, HubError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(HubError::Validation(
                "Repository name required".to_string(),
            ));
        }
        if name.contains('/') {
            return Err(HubError::Validation(
                "Repository name cannot contain '/'".to_string(),
            ));
        }

        let mut tags: Vec<String> = Vec::new();
        for tag in self.tags {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        if tags.len() > MAX_TAGS {
            return Err(HubError::Validation(format!(
                "A repository can have at most {} tags",
                MAX_TAGS
            )));
        }

        let license = match self.license.trim() {
            "" => License::default().label().to_string(),
            other => other.to_string(),
        };
        let category = match category_slug(&self.category) {
            slug if slug.is_empty() => DEFAULT_CATEGORY.to_string(),
            slug => slug,
        };

        Ok(Self {
            name,
            description: self.description.trim().to_string(),
            is_private: self.is_private,
            tags,
            license,
            category,
        })
    }
}

/// Input for creating a prompt.
#[derive(Debug, Clone, Default)]
pub struct CreatePromptData {
    pub name: String,
    pub content: String,
    pub description: Option<String>,
    pub file_path: String,
}

impl CreatePromptData {
    /// A markdown prompt file: `name` gets a `.md` suffix when missing and is
    /// used as the file path too.
    pub fn markdown(name: &str, content: &str, description: Option<&str>) -> Self {
        let file_name = markdown_file_name(name);
        Self {
            name: file_name.clone(),
            content: content.to_string(),
            description: description.map(str::to_string),
            file_path: file_name,
        }
    }
}

/// Partial prompt update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PromptUpdate {
    pub name: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
}

pub fn markdown_file_name(name: &str) -> String {
    let name = name.trim();
    if name.ends_with(".md") {
        name.to_string()
    } else {
        format!("{}.md", name)
    }
}

/// Byte length of prompt content, as stored in `Prompt::size`.
pub fn content_size(content: &str) -> i64 {
    content.len() as i64
}

/// A repository together with its prompts, used for exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryBundle {
    pub repository: Repository,
    pub prompts: Vec<Prompt>,
}
