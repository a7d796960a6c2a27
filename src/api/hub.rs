//! The main entry point for interacting with the hub.

use std::path::PathBuf;
use std::sync::Arc;

use super::error::{BackendContext, HubError, HubResult};
use super::generation::ResponseGenerator;
use super::models::{Repository, RepositoryBundle};
use super::prompt_service::PromptService;
use super::repository_service::RepositoryService;
use super::repository_store::RepositoryStore;
use crate::backend::{AuthUser, BackendError, SqliteBackend};
use crate::core::config::HubConfig;
use crate::core::session::{self, SavedSession};
use crate::core::utils::ensure_dir;

/// Bundles the backend, the services and the repository store.
///
/// Create it once per process. The signed-in user is persisted to the
/// session file so that later invocations resume it.
pub struct PromptHub {
    config: HubConfig,
    backend: Arc<SqliteBackend>,
    session_path: Option<PathBuf>,
    repositories: RepositoryService,
    prompts: PromptService,
    store: RepositoryStore,
}

impl PromptHub {
    /// Opens the database under the configured home and resumes the saved
    /// session, if any.
    pub fn open(config: HubConfig) -> HubResult<Self> {
        ensure_dir(&config.home)?;
        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            ensure_dir(parent)?;
        }
        tracing::debug!(path = %db_path.display(), "opening database");
        let backend = SqliteBackend::open(&db_path).context("Failed to open database")?;
        let session_path = config.session_path();
        let hub = Self::assemble(config, backend, Some(session_path))?;
        hub.resume()?;
        Ok(hub)
    }

    /// A hub over a private in-memory database that never touches disk.
    pub fn in_memory(config: HubConfig) -> HubResult<Self> {
        let backend = SqliteBackend::open_in_memory().context("Failed to open database")?;
        Self::assemble(config, backend, None)
    }

    fn assemble(
        config: HubConfig,
        backend: SqliteBackend,
        session_path: Option<PathBuf>,
    ) -> HubResult<Self> {
        let backend = Arc::new(backend);
        let repositories = RepositoryService::new(backend.clone());
        let prompts = PromptService::new(backend.clone());
        let store = RepositoryStore::new(repositories.clone());
        Ok(Self {
            config,
            backend,
            session_path,
            repositories,
            prompts,
            store,
        })
    }

    fn resume(&self) -> HubResult<()> {
        let Some(path) = &self.session_path else {
            return Ok(());
        };
        let Some(saved) = session::load(path)? else {
            return Ok(());
        };
        let user = self
            .backend
            .resume_session(&saved.user_id)
            .context("Failed to restore session")?;
        if user.is_none() {
            tracing::warn!(user_id = %saved.user_id, "saved session refers to a missing account");
            session::clear(path)?;
        }
        Ok(())
    }

    pub fn sign_up(&self, email: &str, password: &str, username: Option<&str>) -> HubResult<AuthUser> {
        let user = self
            .backend
            .sign_up(email, password, username)
            .map_err(sign_up_error)?;
        self.persist(&user)?;
        tracing::info!(user_id = %user.id, "account created");
        Ok(user)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> HubResult<AuthUser> {
        let user = self.backend.sign_in(email, password).map_err(sign_in_error)?;
        self.persist(&user)?;
        Ok(user)
    }

    pub fn sign_out(&self) -> HubResult<()> {
        self.backend.sign_out().context("Failed to sign out")?;
        if let Some(path) = &self.session_path {
            session::clear(path)?;
        }
        Ok(())
    }

    pub fn current_user(&self) -> HubResult<Option<AuthUser>> {
        self.repositories.current_user()
    }

    pub fn repositories(&self) -> &RepositoryService {
        &self.repositories
    }

    pub fn prompts(&self) -> &PromptService {
        &self.prompts
    }

    pub fn store(&self) -> &RepositoryStore {
        &self.store
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// A generator for the configured provider; fails when no API key is set.
    pub fn generator(&self) -> HubResult<ResponseGenerator> {
        ResponseGenerator::from_config(&self.config)
    }

    /// Resolves an `owner/name` route.
    pub fn resolve(&self, owner: &str, name: &str) -> HubResult<Repository> {
        self.repositories.get_repository(owner, name)
    }

    /// A repository and all its prompts, for exporting.
    pub fn bundle(&self, owner: &str, name: &str) -> HubResult<RepositoryBundle> {
        let repository = self.resolve(owner, name)?;
        let prompts = self.prompts.list_prompts(&repository.id)?;
        Ok(RepositoryBundle {
            repository,
            prompts,
        })
    }

    fn persist(&self, user: &AuthUser) -> HubResult<()> {
        if let Some(path) = &self.session_path {
            session::save(
                path,
                &SavedSession {
                    user_id: user.id.clone(),
                    email: user.email.clone(),
                },
            )?;
        }
        Ok(())
    }
}

/// Sign-up failures are input problems: a weak password or a taken address.
fn sign_up_error(err: BackendError) -> HubError {
    match err {
        BackendError::Auth(message) => HubError::Validation(message),
        BackendError::Conflict(_) => {
            HubError::Validation("An account with this email or username already exists".to_string())
        }
        other => auth_backend_error(other),
    }
}

fn sign_in_error(err: BackendError) -> HubError {
    match err {
        BackendError::Auth(message) => HubError::NotAuthenticated(message),
        other => auth_backend_error(other),
    }
}

fn auth_backend_error(source: BackendError) -> HubError {
    tracing::error!(error = %source, "Authentication failed");
    HubError::Backend {
        context: "Authentication failed".to_string(),
        source,
    }
}
