//! Prompt CRUD gated by a repository ownership check.

use std::sync::Arc;

use super::error::{BackendContext, HubError, HubResult};
use super::models::{content_size, CreatePromptData, PromptUpdate};
use crate::backend::{AuthUser, Backend, NewPrompt, Prompt, PromptChanges};

#[derive(Clone)]
pub struct PromptService {
    backend: Arc<dyn Backend>,
}

impl PromptService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Adds a prompt to a repository owned by the signed-in user.
    ///
    /// Ownership is read and compared before the insert; the backend's own
    /// rules still apply afterwards.
    pub fn create_prompt(&self, repository_id: &str, data: CreatePromptData) -> HubResult<Prompt> {
        let name = data.name.trim().to_string();
        if name.is_empty() || data.content.trim().is_empty() {
            return Err(HubError::Validation(
                "Please provide both a name and content for the prompt".to_string(),
            ));
        }
        let user = self.require_user("User must be authenticated to create prompts")?;
        self.ensure_owner(
            repository_id,
            &user,
            "You do not have permission to create prompts in this repository",
        )?;

        let file_path = match data.file_path.trim() {
            "" => name.clone(),
            path => path.to_string(),
        };
        let new_prompt = NewPrompt {
            repository_id: repository_id.to_string(),
            name,
            size: content_size(&data.content),
            content: data.content,
            description: data.description.unwrap_or_default(),
            file_path,
        };
        tracing::info!(
            repository_id,
            name = %new_prompt.name,
            size = new_prompt.size,
            "creating prompt"
        );
        self.backend
            .insert_prompt(&new_prompt)
            .context("Failed to create prompt")
    }

    /// Prompts of a repository, newest first.
    pub fn list_prompts(&self, repository_id: &str) -> HubResult<Vec<Prompt>> {
        self.backend
            .select_prompts(repository_id)
            .context("Failed to load prompts")
    }

    pub fn get_prompt(&self, prompt_id: &str) -> HubResult<Option<Prompt>> {
        self.backend
            .select_prompt(prompt_id)
            .context("Failed to load prompt")
    }

    /// Finds the single prompt of a repository whose name or file path is `name`.
    pub fn find_prompt(&self, repository_id: &str, name: &str) -> HubResult<Prompt> {
        let name = name.trim();
        let mut matches: Vec<Prompt> = self
            .list_prompts(repository_id)?
            .into_iter()
            .filter(|p| p.name == name || p.file_path == name)
            .collect();
        match matches.len() {
            0 => Err(HubError::NotFound(format!("No prompt named '{}'", name))),
            1 => Ok(matches.remove(0)),
            n => Err(HubError::Validation(format!(
                "{} prompts match '{}'; rename one of them to pick it",
                n, name
            ))),
        }
    }

    /// Applies a partial update. `size` is recomputed whenever content is given.
    pub fn update_prompt(&self, prompt_id: &str, update: PromptUpdate) -> HubResult<Prompt> {
        let user = self.require_user("User must be authenticated to update prompts")?;
        let prompt = self.load_existing(prompt_id)?;
        self.ensure_owner(
            &prompt.repository_id,
            &user,
            "You do not have permission to update prompts in this repository",
        )?;

        if matches!(update.name.as_deref(), Some(n) if n.trim().is_empty()) {
            return Err(HubError::Validation("Prompt name cannot be empty".to_string()));
        }
        let changes = PromptChanges {
            name: update.name.map(|n| n.trim().to_string()),
            size: update.content.as_deref().map(content_size),
            content: update.content,
            description: update.description,
            file_path: update.file_path,
        };
        if changes.is_empty() {
            return Ok(prompt);
        }

        self.backend
            .update_prompt(prompt_id, &changes)
            .context("Failed to update prompt")
    }

    pub fn delete_prompt(&self, prompt_id: &str) -> HubResult<()> {
        let user = self.require_user("User must be authenticated to delete prompts")?;
        let prompt = self.load_existing(prompt_id)?;
        self.ensure_owner(
            &prompt.repository_id,
            &user,
            "You do not have permission to delete prompts in this repository",
        )?;
        self.backend
            .delete_prompt(prompt_id)
            .context("Failed to delete prompt")?;
        tracing::info!(prompt_id, "prompt deleted");
        Ok(())
    }

    fn load_existing(&self, prompt_id: &str) -> HubResult<Prompt> {
        self.get_prompt(prompt_id)?
            .ok_or_else(|| HubError::NotFound(format!("Prompt '{}' not found", prompt_id)))
    }

    fn require_user(&self, message: &str) -> HubResult<AuthUser> {
        self.backend
            .current_user()
            .context("Failed to get user information")?
            .ok_or_else(|| HubError::NotAuthenticated(message.to_string()))
    }

    fn ensure_owner(&self, repository_id: &str, user: &AuthUser, denied: &str) -> HubResult<()> {
        let repository = self
            .backend
            .select_repository(repository_id)
            .context("Failed to verify repository ownership")?;
        match repository {
            Some(repo) if repo.owner_id == user.id => Ok(()),
            Some(_) => Err(HubError::PermissionDenied(denied.to_string())),
            None => Err(HubError::NotFound(format!(
                "Repository '{}' not found",
                repository_id
            ))),
        }
    }
}
