mod support;

use prompthub::api::{HubError, SearchQuery};
use prompthub::backend::{Backend, BackendError};
use support::{repo_data, Harness};

#[test]
fn duplicate_names_conflict_only_for_the_same_owner() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    h.repos.create_repository(repo_data("kit", "", &[])).unwrap();

    let err = h.repos.create_repository(repo_data("kit", "", &[])).unwrap_err();
    assert!(matches!(err.backend_source(), Some(BackendError::Conflict(_))));

    h.backend.sign_up("bob@example.com");
    let theirs = h.repos.create_repository(repo_data("kit", "", &[])).unwrap();
    assert_eq!(theirs.full_name(), "bob/kit");
}

#[test]
fn star_then_unstar_leaves_count_unchanged() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    let repo = h.repos.create_repository(repo_data("kit", "", &[])).unwrap();
    let before = h.repos.find_by_id(&repo.id).unwrap().stars_count;

    h.repos.star_repository(&repo.id).unwrap();
    assert_eq!(h.repos.find_by_id(&repo.id).unwrap().stars_count, before + 1);
    h.repos.unstar_repository(&repo.id).unwrap();
    assert_eq!(h.repos.find_by_id(&repo.id).unwrap().stars_count, before);
}

#[test]
fn unstar_without_star_does_not_decrement() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    let repo = h.repos.create_repository(repo_data("kit", "", &[])).unwrap();
    h.backend.sign_up("bob@example.com");
    h.repos.star_repository(&repo.id).unwrap();

    h.backend.sign_up("cy@example.com");
    h.repos.unstar_repository(&repo.id).unwrap();
    assert_eq!(h.repos.find_by_id(&repo.id).unwrap().stars_count, 1);
}

#[test]
fn double_star_is_rejected() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    let repo = h.repos.create_repository(repo_data("kit", "", &[])).unwrap();
    h.repos.star_repository(&repo.id).unwrap();

    let err = h.repos.star_repository(&repo.id).unwrap_err();
    assert!(matches!(err.backend_source(), Some(BackendError::Conflict(_))));
    assert_eq!(h.repos.find_by_id(&repo.id).unwrap().stars_count, 1);
}

#[test]
fn failing_counter_rpc_drifts_until_repaired() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    let repo = h.repos.create_repository(repo_data("kit", "", &[])).unwrap();

    h.backend.set_rpc_failure(true);
    h.repos.star_repository(&repo.id).unwrap();
    assert!(h.backend.star_exists(&repo.owner_id, &repo.id).unwrap());
    assert_eq!(h.repos.find_by_id(&repo.id).unwrap().stars_count, 0);

    assert!(matches!(
        h.repos.repair_star_count(&repo.id),
        Err(HubError::Backend { .. })
    ));

    h.backend.set_rpc_failure(false);
    h.repos.repair_star_count(&repo.id).unwrap();
    assert_eq!(h.repos.find_by_id(&repo.id).unwrap().stars_count, 1);
}

#[test]
fn private_repositories_stay_hidden_from_others() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    let mut data = repo_data("secret", "", &[]);
    data.is_private = true;
    let private = h.repos.create_repository(data).unwrap();
    h.repos.create_repository(repo_data("open", "", &[])).unwrap();

    h.backend.sign_up("bob@example.com");
    let names: Vec<_> = h
        .repos
        .load_repositories()
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["open"]);
    assert!(matches!(
        h.repos.find_by_id(&private.id),
        Err(HubError::NotFound(_))
    ));
    assert!(matches!(
        h.repos.get_repository("ada", "secret"),
        Err(HubError::NotFound(_))
    ));
}

#[test]
fn search_hits_by_tag_name_or_description() {
    let h = Harness::new();
    h.backend.sign_up("ada@example.com");
    let store = h.store();
    store
        .create_repository(repo_data("outreach", "Cold Email sequences", &["sales"]))
        .unwrap();
    store
        .create_repository(repo_data("notes", "Release notes", &["devops"]))
        .unwrap();
    store.refresh().unwrap();

    let names = |q: &str| -> Vec<String> {
        store
            .search(&SearchQuery::text(q))
            .into_iter()
            .map(|r| r.name)
            .collect()
    };
    assert_eq!(names("SALES"), vec!["outreach"]);
    assert_eq!(names("Notes"), vec!["notes"]);
    assert_eq!(names("email"), vec!["outreach"]);
    assert!(names("kubernetes").is_empty());
}
