//! ConfigService over the in-memory store: what gets persisted.

use podsmith_adapters::MemoryConfigStore;
use podsmith_core::{
    application::{ConfigService, ports::ConfigStore},
    domain::{ConfigDocument, keys},
};
use serde_json::json;

fn service(store: &MemoryConfigStore) -> ConfigService {
    ConfigService::load(Box::new(store.clone()))
}

#[test]
fn first_load_persists_defaults() {
    let store = MemoryConfigStore::new();
    service(&store);
    assert_eq!(store.saved(), Some(ConfigDocument::defaults()));
}

#[test]
fn unknown_default_is_never_persisted() {
    let store = MemoryConfigStore::new();
    let mut config = service(&store);
    config.add_spec_repo("Specs", "git@host:Specs.git").unwrap();

    assert!(config.set(keys::DEFAULT_SPEC_REPO, json!("Ghost")).is_err());

    let saved = store.saved().unwrap();
    assert_eq!(saved.default_spec_repo(), Some("Specs"));
}

#[test]
fn emptied_registry_persists_without_default() {
    let store = MemoryConfigStore::new();
    let mut config = service(&store);
    config.add_spec_repo("Specs", "git@host:Specs.git").unwrap();

    config.set(keys::SPEC_REPOS, json!({})).unwrap();

    let saved = store.saved().unwrap();
    assert_eq!(saved.default_spec_repo(), None);
    assert!(saved.spec_repos().is_empty());
}

#[test]
fn dangling_default_in_store_is_cleared_on_load() {
    let mut stored = ConfigDocument::defaults();
    stored.set(keys::DEFAULT_SPEC_REPO, json!("Ghost")).unwrap();
    let store = MemoryConfigStore::with_document(stored);

    let config = service(&store);

    assert_eq!(config.default_spec_repo(), None);
    assert_eq!(store.saved().unwrap().default_spec_repo(), None);
}

#[test]
fn reload_sees_external_changes() {
    let store = MemoryConfigStore::new();
    let mut config = service(&store);

    let mut edited = store.saved().unwrap();
    edited.set(keys::AUTHOR, json!("Jane")).unwrap();
    store.save(&edited).unwrap();

    config.reload();
    assert_eq!(config.identity().author, "Jane");
}
