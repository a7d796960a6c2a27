#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use prompthub::api::{CreateRepositoryData, PromptService, RepositoryService, RepositoryStore};
use prompthub::backend::{
    AuthUser, Backend, BackendError, BackendResult, NewPrompt, NewRepository, Profile, Prompt,
    PromptChanges, RepositoryRecord, Rpc, SqliteBackend,
};

/// Delegates to an in-memory backend while counting prompt inserts and
/// optionally failing every RPC.
pub struct InstrumentedBackend {
    pub inner: SqliteBackend,
    pub prompt_inserts: AtomicUsize,
    pub fail_rpcs: AtomicBool,
}

impl InstrumentedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: SqliteBackend::open_in_memory().unwrap(),
            prompt_inserts: AtomicUsize::new(0),
            fail_rpcs: AtomicBool::new(false),
        })
    }

    pub fn sign_up(&self, email: &str) -> AuthUser {
        self.inner.sign_up(email, "secret-pass", None).unwrap()
    }

    pub fn inserts(&self) -> usize {
        self.prompt_inserts.load(Ordering::SeqCst)
    }

    pub fn set_rpc_failure(&self, fail: bool) {
        self.fail_rpcs.store(fail, Ordering::SeqCst);
    }
}

impl Backend for InstrumentedBackend {
    fn current_user(&self) -> BackendResult<Option<AuthUser>> {
        self.inner.current_user()
    }
    fn select_profile(&self, id: &str) -> BackendResult<Option<Profile>> {
        self.inner.select_profile(id)
    }
    fn select_profiles(&self, ids: &[String]) -> BackendResult<Vec<Profile>> {
        self.inner.select_profiles(ids)
    }
    fn select_profiles_by_username(&self, username: &str) -> BackendResult<Vec<Profile>> {
        self.inner.select_profiles_by_username(username)
    }
    fn upsert_profile(&self, profile: &Profile) -> BackendResult<()> {
        self.inner.upsert_profile(profile)
    }
    fn select_public_repositories(&self) -> BackendResult<Vec<RepositoryRecord>> {
        self.inner.select_public_repositories()
    }
    fn select_repository(&self, id: &str) -> BackendResult<Option<RepositoryRecord>> {
        self.inner.select_repository(id)
    }
    fn select_repositories_by_owner(
        &self,
        owner_id: &str,
        name: &str,
    ) -> BackendResult<Vec<RepositoryRecord>> {
        self.inner.select_repositories_by_owner(owner_id, name)
    }
    fn insert_repository(&self, repo: &NewRepository) -> BackendResult<RepositoryRecord> {
        self.inner.insert_repository(repo)
    }
    fn star_exists(&self, user_id: &str, repository_id: &str) -> BackendResult<bool> {
        self.inner.star_exists(user_id, repository_id)
    }
    fn select_starred_ids(&self, user_id: &str) -> BackendResult<Vec<String>> {
        self.inner.select_starred_ids(user_id)
    }
    fn insert_star(&self, user_id: &str, repository_id: &str) -> BackendResult<()> {
        self.inner.insert_star(user_id, repository_id)
    }
    fn delete_star(&self, user_id: &str, repository_id: &str) -> BackendResult<usize> {
        self.inner.delete_star(user_id, repository_id)
    }
    fn rpc(&self, call: &Rpc) -> BackendResult<()> {
        if self.fail_rpcs.load(Ordering::SeqCst) {
            return Err(BackendError::NotFound(format!("function {}", call.name())));
        }
        self.inner.rpc(call)
    }
    fn select_prompts(&self, repository_id: &str) -> BackendResult<Vec<Prompt>> {
        self.inner.select_prompts(repository_id)
    }
    fn select_prompt(&self, id: &str) -> BackendResult<Option<Prompt>> {
        self.inner.select_prompt(id)
    }
    fn insert_prompt(&self, prompt: &NewPrompt) -> BackendResult<Prompt> {
        self.prompt_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_prompt(prompt)
    }
    fn update_prompt(&self, id: &str, changes: &PromptChanges) -> BackendResult<Prompt> {
        self.inner.update_prompt(id, changes)
    }
    fn delete_prompt(&self, id: &str) -> BackendResult<()> {
        self.inner.delete_prompt(id)
    }
}

pub struct Harness {
    pub backend: Arc<InstrumentedBackend>,
    pub repos: RepositoryService,
    pub prompts: PromptService,
}

impl Harness {
    pub fn new() -> Self {
        let backend = InstrumentedBackend::new();
        Self {
            repos: RepositoryService::new(backend.clone()),
            prompts: PromptService::new(backend.clone()),
            backend,
        }
    }

    pub fn store(&self) -> RepositoryStore {
        RepositoryStore::new(self.repos.clone())
    }
}

pub fn repo_data(name: &str, description: &str, tags: &[&str]) -> CreateRepositoryData {
    CreateRepositoryData {
        name: name.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}
