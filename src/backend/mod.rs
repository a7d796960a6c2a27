//! The backend client: tables, row-level rules and RPC functions.
//!
//! Services only talk to the [`Backend`] trait. [`SqliteBackend`] is the
//! bundled implementation and also owns authentication.

mod error;
mod records;
mod schema;
mod sqlite;

pub use error::{BackendError, BackendResult};
pub use records::{
    AuthUser, NewPrompt, NewRepository, Profile, Prompt, PromptChanges, RepositoryRecord, Rpc,
};
pub use sqlite::SqliteBackend;

/// Query surface of the relational backend, grouped by table.
///
/// Implementations enforce their own authorization: callers may still be
/// rejected with [`BackendError::PermissionDenied`] after passing any
/// client-side check.
pub trait Backend: Send + Sync {
    /// The user attached to the current session, if any.
    fn current_user(&self) -> BackendResult<Option<AuthUser>>;

    fn select_profile(&self, id: &str) -> BackendResult<Option<Profile>>;
    fn select_profiles(&self, ids: &[String]) -> BackendResult<Vec<Profile>>;
    fn select_profiles_by_username(&self, username: &str) -> BackendResult<Vec<Profile>>;
    fn upsert_profile(&self, profile: &Profile) -> BackendResult<()>;

    /// Non-private repositories, newest first.
    fn select_public_repositories(&self) -> BackendResult<Vec<RepositoryRecord>>;
    fn select_repository(&self, id: &str) -> BackendResult<Option<RepositoryRecord>>;
    fn select_repositories_by_owner(
        &self,
        owner_id: &str,
        name: &str,
    ) -> BackendResult<Vec<RepositoryRecord>>;
    fn insert_repository(&self, repo: &NewRepository) -> BackendResult<RepositoryRecord>;

    fn star_exists(&self, user_id: &str, repository_id: &str) -> BackendResult<bool>;
    fn select_starred_ids(&self, user_id: &str) -> BackendResult<Vec<String>>;
    fn insert_star(&self, user_id: &str, repository_id: &str) -> BackendResult<()>;
    /// Returns the number of star rows removed.
    fn delete_star(&self, user_id: &str, repository_id: &str) -> BackendResult<usize>;

    fn rpc(&self, call: &Rpc) -> BackendResult<()>;

    /// Prompts of a repository, newest first.
    fn select_prompts(&self, repository_id: &str) -> BackendResult<Vec<Prompt>>;
    fn select_prompt(&self, id: &str) -> BackendResult<Option<Prompt>>;
    fn insert_prompt(&self, prompt: &NewPrompt) -> BackendResult<Prompt>;
    fn update_prompt(&self, id: &str, changes: &PromptChanges) -> BackendResult<Prompt>;
    fn delete_prompt(&self, id: &str) -> BackendResult<()>;
}
