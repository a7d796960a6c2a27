mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use support::{repo_data, Harness};

#[test]
fn subscribers_follow_refresh_and_create_until_dropped() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    let store = h.store();

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let f = first.clone();
    let sub_first = store.subscribe(move || {
        f.fetch_add(1, Ordering::SeqCst);
    });
    let s = second.clone();
    let sub_second = store.subscribe(move || {
        s.fetch_add(1, Ordering::SeqCst);
    });

    store.refresh().unwrap();
    store.create_repository(repo_data("kit", "", &[])).unwrap();
    assert_eq!(first.load(Ordering::SeqCst), 2);
    assert_eq!(second.load(Ordering::SeqCst), 2);

    sub_first.unsubscribe();
    store.refresh().unwrap();
    assert_eq!(first.load(Ordering::SeqCst), 2);
    assert_eq!(second.load(Ordering::SeqCst), 3);

    drop(sub_second);
    store.refresh().unwrap();
    assert_eq!(second.load(Ordering::SeqCst), 3);
}

#[test]
fn failed_mutation_keeps_cached_list() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    let store = h.store();
    store.create_repository(repo_data("kit", "", &[])).unwrap();
    assert_eq!(store.repositories().len(), 1);

    h.backend.inner.sign_out().unwrap();
    assert!(store.star("missing").is_err());
    assert_eq!(store.repositories().len(), 1);
}

#[test]
fn fork_reloads_and_counts_contributors() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    let store = h.store();
    let source = store
        .create_repository(repo_data("kit", "", &["email", "sales"]))
        .unwrap();

    h.backend.sign_up("bob@example.com");
    let fork = store.fork(&source.id).unwrap();

    let repos = store.repositories();
    assert_eq!(repos.len(), 2);
    let reloaded_source = repos.iter().find(|r| r.id == source.id).unwrap();
    assert_eq!(reloaded_source.forks_count, 1);
    assert!(repos.iter().any(|r| r.id == fork.id));

    let stats = store.stats();
    assert_eq!(stats.total_repos, 2);
    assert_eq!(stats.total_tags, 4);
    assert_eq!(stats.total_contributors, 2);
}
