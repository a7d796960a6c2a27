//! Repository listing, creation, stars and forks.

use std::collections::HashSet;
use std::sync::Arc;

use super::error::{BackendContext, HubError, HubResult};
use super::models::{CreateRepositoryData, Repository};
use crate::backend::{AuthUser, Backend, NewPrompt, NewRepository, Profile, Rpc};

#[derive(Clone)]
pub struct RepositoryService {
    backend: Arc<dyn Backend>,
}

impl RepositoryService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Public repositories joined with their owners, newest first.
    ///
    /// Repositories whose owner has no profile are left out.
    pub fn load_repositories(&self) -> HubResult<Vec<Repository>> {
        let records = self
            .backend
            .select_public_repositories()
            .context("Failed to load repositories")?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut owner_ids: Vec<String> = Vec::new();
        for record in &records {
            if !owner_ids.contains(&record.owner_id) {
                owner_ids.push(record.owner_id.clone());
            }
        }
        let profiles = self
            .backend
            .select_profiles(&owner_ids)
            .context("Failed to load profiles")?;

        let starred: Option<HashSet<String>> = match self.current_user()? {
            Some(user) => Some(
                self.backend
                    .select_starred_ids(&user.id)
                    .context("Failed to load stars")?
                    .into_iter()
                    .collect(),
            ),
            None => None,
        };

        Ok(records
            .into_iter()
            .filter_map(|record| {
                let profile = profiles.iter().find(|p| p.id == record.owner_id)?;
                if profile.username.is_empty() {
                    return None;
                }
                let is_starred = starred.as_ref().map(|s| s.contains(&record.id));
                Some(Repository::from_record(record, profile, is_starred))
            })
            .collect())
    }

    /// Resolves a repository by its `owner/name` route.
    pub fn get_repository(&self, owner: &str, name: &str) -> HubResult<Repository> {
        let mut owners = self
            .backend
            .select_profiles_by_username(owner)
            .context("Failed to load owner profile")?;
        let owner_profile = match owners.len() {
            0 => return Err(HubError::NotFound(format!("User '{}' not found", owner))),
            1 => owners.remove(0),
            _ => {
                return Err(HubError::Validation(format!(
                    "Multiple users found with username '{}'",
                    owner
                )))
            }
        };

        let mut repos = self
            .backend
            .select_repositories_by_owner(&owner_profile.id, name)
            .context("Failed to load repository")?;
        let record = match repos.len() {
            0 => {
                return Err(HubError::NotFound(format!(
                    "Repository '{}' not found for user '{}'",
                    name, owner
                )))
            }
            1 => repos.remove(0),
            _ => {
                return Err(HubError::Validation(format!(
                    "Multiple repositories found with name '{}'",
                    name
                )))
            }
        };

        let is_starred = self.starred_by_current_user(&record.id);
        Ok(Repository::from_record(record, &owner_profile, is_starred))
    }

    /// Looks a repository up by id, honouring visibility rules.
    pub fn find_by_id(&self, id: &str) -> HubResult<Repository> {
        let record = self
            .backend
            .select_repository(id)
            .context("Failed to load repository")?
            .ok_or_else(|| HubError::NotFound(format!("Repository '{}' not found", id)))?;
        let owner = self
            .backend
            .select_profile(&record.owner_id)
            .context("Failed to load owner profile")?
            .ok_or_else(|| {
                HubError::NotFound(format!("Owner of repository '{}' not found", record.name))
            })?;
        let is_starred = self.starred_by_current_user(&record.id);
        Ok(Repository::from_record(record, &owner, is_starred))
    }

    /// Creates a repository owned by the signed-in user.
    ///
    /// The caller's profile is backfilled first when it is missing. The
    /// backfill and the insert are separate writes.
    pub fn create_repository(&self, data: CreateRepositoryData) -> HubResult<Repository> {
        let data = data.normalized()?;
        let user = self.require_user("User must be authenticated to create repositories")?;
        let profile = self.ensure_profile(&user)?;

        tracing::info!(
            name = %data.name,
            owner_id = %user.id,
            is_private = data.is_private,
            "creating repository"
        );
        let record = self
            .backend
            .insert_repository(&NewRepository {
                name: data.name,
                description: data.description,
                owner_id: user.id.clone(),
                is_private: data.is_private,
                tags: data.tags,
                license: data.license,
                category: data.category,
                forked_from: None,
            })
            .context("Failed to create repository")?;

        Ok(Repository::from_record(record, &profile, Some(false)))
    }

    /// Stars a repository. A failing counter update is logged only.
    pub fn star_repository(&self, repository_id: &str) -> HubResult<()> {
        let user = self.require_user("User must be authenticated to star repositories")?;
        self.backend
            .insert_star(&user.id, repository_id)
            .context("Failed to star repository")?;
        self.call_counter(Rpc::IncrementStarsCount(repository_id.to_string()));
        Ok(())
    }

    /// Removes the caller's star. The counter is only decremented when a star
    /// row was actually removed; a failing counter update is logged only.
    pub fn unstar_repository(&self, repository_id: &str) -> HubResult<()> {
        let user = self.require_user("User must be authenticated to unstar repositories")?;
        let removed = self
            .backend
            .delete_star(&user.id, repository_id)
            .context("Failed to unstar repository")?;
        if removed > 0 {
            self.call_counter(Rpc::DecrementStarsCount(repository_id.to_string()));
        } else {
            tracing::debug!(repository_id, "repository was not starred");
        }
        Ok(())
    }

    /// Copies a repository and its prompts under the signed-in user.
    pub fn fork_repository(&self, repository_id: &str) -> HubResult<Repository> {
        let user = self.require_user("User must be authenticated to fork repositories")?;
        let source = self.find_by_id(repository_id)?;
        if source.owner_id == user.id {
            return Err(HubError::Validation(
                "You cannot fork your own repository".to_string(),
            ));
        }
        let prompts = self
            .backend
            .select_prompts(&source.id)
            .context("Failed to load prompts")?;
        let profile = self.ensure_profile(&user)?;

        let record = self
            .backend
            .insert_repository(&NewRepository {
                name: source.name.clone(),
                description: source.description.clone(),
                owner_id: user.id.clone(),
                is_private: false,
                tags: source.tags.clone(),
                license: source.license.clone(),
                category: source.category.clone(),
                forked_from: Some(source.id.clone()),
            })
            .context("Failed to fork repository")?;

        // Oldest first so the copies keep the source's relative order.
        for prompt in prompts.into_iter().rev() {
            self.backend
                .insert_prompt(&NewPrompt {
                    repository_id: record.id.clone(),
                    name: prompt.name,
                    content: prompt.content,
                    description: prompt.description,
                    file_path: prompt.file_path,
                    size: prompt.size,
                })
                .context("Failed to copy prompt into fork")?;
        }

        self.call_counter(Rpc::IncrementForksCount(source.id.clone()));
        tracing::info!(source = %source.full_name(), fork_id = %record.id, "repository forked");
        Ok(Repository::from_record(record, &profile, Some(false)))
    }

    /// Resets `stars_count` to the number of star rows.
    pub fn repair_star_count(&self, repository_id: &str) -> HubResult<()> {
        self.backend
            .rpc(&Rpc::RecountStars(repository_id.to_string()))
            .context("Failed to recount stars")
    }

    pub fn profile(&self, user_id: &str) -> HubResult<Option<Profile>> {
        self.backend
            .select_profile(user_id)
            .context("Failed to load profile")
    }

    pub fn current_user(&self) -> HubResult<Option<AuthUser>> {
        self.backend
            .current_user()
            .context("Failed to get user information")
    }

    fn require_user(&self, message: &str) -> HubResult<AuthUser> {
        self.current_user()?
            .ok_or_else(|| HubError::NotAuthenticated(message.to_string()))
    }

    fn ensure_profile(&self, user: &AuthUser) -> HubResult<Profile> {
        let existing = self
            .backend
            .select_profile(&user.id)
            .context("Failed to verify user profile")?;
        if let Some(profile) = existing.filter(|p| !p.username.is_empty()) {
            return Ok(profile);
        }

        tracing::info!(user_id = %user.id, "profile missing a username, backfilling it");
        let username = user.preferred_username().ok_or_else(|| {
            HubError::Validation("Could not determine username for profile".to_string())
        })?;
        let profile = Profile {
            id: user.id.clone(),
            username,
            email: user.email.clone(),
        };
        self.backend
            .upsert_profile(&profile)
            .context("Failed to update user profile")?;
        Ok(profile)
    }

    fn starred_by_current_user(&self, repository_id: &str) -> Option<bool> {
        let user = self.current_user().ok().flatten()?;
        match self.backend.star_exists(&user.id, repository_id) {
            Ok(starred) => Some(starred),
            Err(e) => {
                tracing::error!(error = %e, repository_id, "Error checking star status");
                None
            }
        }
    }

    fn call_counter(&self, call: Rpc) {
        if let Err(e) = self.backend.rpc(&call) {
            tracing::error!(
                error = %e,
                rpc = call.name(),
                repository_id = call.repository_id(),
                "Error updating counter"
            );
        }
    }
}
