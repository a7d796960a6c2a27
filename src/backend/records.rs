//! Row types exchanged with the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user attached to the backend session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    /// Username supplied as sign-up metadata, if any.
    pub username: Option<String>,
}

impl AuthUser {
    /// Username to use for a profile: the metadata value, else the email local part.
    pub fn preferred_username(&self) -> Option<String> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.email
                    .split('@')
                    .next()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// A row of the `repositories` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub is_private: bool,
    pub tags: Vec<String>,
    pub license: String,
    pub category: String,
    pub stars_count: i64,
    pub forks_count: i64,
    pub forked_from: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a repository. Counters always start at zero.
#[derive(Debug, Clone)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub is_private: bool,
    pub tags: Vec<String>,
    pub license: String,
    pub category: String,
    pub forked_from: Option<String>,
}

/// A row of the `prompts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub repository_id: String,
    pub name: String,
    pub content: String,
    pub description: String,
    pub file_path: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPrompt {
    pub repository_id: String,
    pub name: String,
    pub content: String,
    pub description: String,
    pub file_path: String,
    pub size: i64,
}

/// Partial update of a prompt; `None` columns are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PromptChanges {
    pub name: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub size: Option<i64>,
}

impl PromptChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.content.is_none()
            && self.description.is_none()
            && self.file_path.is_none()
            && self.size.is_none()
    }
}

/// Server-side functions callable by any client. They bypass row-level rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rpc {
    IncrementStarsCount(String),
    DecrementStarsCount(String),
    IncrementForksCount(String),
    /// Resets `stars_count` to the number of star rows.
    RecountStars(String),
}

impl Rpc {
    pub fn name(&self) -> &'static str {
        match self {
            Rpc::IncrementStarsCount(_) => "increment_stars_count",
            Rpc::DecrementStarsCount(_) => "decrement_stars_count",
            Rpc::IncrementForksCount(_) => "increment_forks_count",
            Rpc::RecountStars(_) => "recount_stars",
        }
    }

    pub fn repository_id(&self) -> &str {
        match self {
            Rpc::IncrementStarsCount(id)
            | Rpc::DecrementStarsCount(id)
            | Rpc::IncrementForksCount(id)
            | Rpc::RecountStars(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, username: Option<&str>) -> AuthUser {
        AuthUser {
            id: "u1".into(),
            email: email.into(),
            username: username.map(String::from),
        }
    }

    #[test]
    fn preferred_username_uses_metadata_first() {
        assert_eq!(
            user("ada@example.com", Some("lovelace")).preferred_username(),
            Some("lovelace".to_string())
        );
    }

    #[test]
    fn preferred_username_falls_back_to_email_local_part() {
        assert_eq!(
            user("ada@example.com", Some("  ")).preferred_username(),
            Some("ada".to_string())
        );
        assert_eq!(user("@example.com", None).preferred_username(), None);
    }

    #[test]
    fn rpc_names_match_backend_functions() {
        let rpc = Rpc::DecrementStarsCount("r1".into());
        assert_eq!(rpc.name(), "decrement_stars_count");
        assert_eq!(rpc.repository_id(), "r1");
    }
}
