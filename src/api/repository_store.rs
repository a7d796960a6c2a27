//! Cached repository list with change listeners.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::error::HubResult;
use super::models::{CreateRepositoryData, Repository};
use super::repository_service::RepositoryService;
use super::search::{self, SearchQuery};

type Listener = Arc<dyn Fn() + Send + Sync>;
type Listeners = Mutex<Vec<(u64, Listener)>>;

/// Aggregate figures over the cached list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub total_repos: usize,
    /// Tag occurrences summed over all repositories.
    pub total_tags: usize,
    /// Distinct repository owners.
    pub total_contributors: usize,
}

/// Holds the last loaded repositories and tells listeners when they change.
pub struct RepositoryStore {
    service: RepositoryService,
    repositories: Mutex<Vec<Repository>>,
    listeners: Arc<Listeners>,
    next_id: AtomicU64,
}

/// Keeps a listener registered until dropped.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).retain(|(id, _)| *id != self.id);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RepositoryStore {
    pub fn new(service: RepositoryService) -> Self {
        Self {
            service,
            repositories: Mutex::new(Vec::new()),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Reloads every repository and notifies listeners.
    pub fn refresh(&self) -> HubResult<()> {
        let repositories = self.service.load_repositories()?;
        tracing::debug!(count = repositories.len(), "repository store refreshed");
        *lock(&self.repositories) = repositories;
        self.notify();
        Ok(())
    }

    pub fn repositories(&self) -> Vec<Repository> {
        lock(&self.repositories).clone()
    }

    pub fn create_repository(&self, data: CreateRepositoryData) -> HubResult<Repository> {
        let repository = self.service.create_repository(data)?;
        lock(&self.repositories).insert(0, repository.clone());
        self.notify();
        Ok(repository)
    }

    pub fn star(&self, repository_id: &str) -> HubResult<()> {
        self.service.star_repository(repository_id)?;
        self.refresh()
    }

    pub fn unstar(&self, repository_id: &str) -> HubResult<()> {
        self.service.unstar_repository(repository_id)?;
        self.refresh()
    }

    pub fn fork(&self, repository_id: &str) -> HubResult<Repository> {
        let fork = self.service.fork_repository(repository_id)?;
        self.refresh()?;
        Ok(fork)
    }

    pub fn stats(&self) -> StoreStats {
        let repositories = lock(&self.repositories);
        let owners: HashSet<&str> = repositories.iter().map(|r| r.owner_id.as_str()).collect();
        StoreStats {
            total_repos: repositories.len(),
            total_tags: repositories.iter().map(|r| r.tags.len()).sum(),
            total_contributors: owners.len(),
        }
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<Repository> {
        search::search(&lock(&self.repositories), query)
    }

    fn notify(&self) {
        let listeners: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SqliteBackend;
    use std::sync::atomic::AtomicUsize;

    fn store() -> (Arc<SqliteBackend>, RepositoryStore) {
        let backend = Arc::new(SqliteBackend::open_in_memory().unwrap());
        let store = RepositoryStore::new(RepositoryService::new(backend.clone()));
        (backend, store)
    }

    fn data(name: &str, tags: &[&str]) -> CreateRepositoryData {
        CreateRepositoryData {
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn listeners_stop_after_drop() {
        let (backend, store) = store();
        backend.sign_up("ada@example.com", "secret-pass", None).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        let subscription = store.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        store.refresh().unwrap();
        store.create_repository(data("kit", &[])).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        drop(subscription);
        store.refresh().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn create_inserts_at_front() {
        let (backend, store) = store();
        backend.sign_up("ada@example.com", "secret-pass", None).unwrap();
        store.create_repository(data("first", &[])).unwrap();
        store.create_repository(data("second", &[])).unwrap();
        let names: Vec<_> = store.repositories().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn stats_count_tags_and_contributors() {
        let (backend, store) = store();
        backend.sign_up("ada@example.com", "secret-pass", None).unwrap();
        store.create_repository(data("a", &["x", "y"])).unwrap();
        store.create_repository(data("b", &["x"])).unwrap();
        backend.sign_up("bob@example.com", "secret-pass", None).unwrap();
        store.create_repository(data("c", &[])).unwrap();

        assert_eq!(
            store.stats(),
            StoreStats {
                total_repos: 3,
                total_tags: 3,
                total_contributors: 2,
            }
        );
    }

    #[test]
    fn star_reloads_counts() {
        let (backend, store) = store();
        backend.sign_up("ada@example.com", "secret-pass", None).unwrap();
        let repo = store.create_repository(data("kit", &["email"])).unwrap();

        store.star(&repo.id).unwrap();
        assert_eq!(store.repositories()[0].stars_count, 1);
        store.unstar(&repo.id).unwrap();
        assert_eq!(store.repositories()[0].stars_count, 0);
        assert_eq!(store.search(&SearchQuery::text("EMAIL")).len(), 1);
    }
}
