//! Config Service - the configuration document plus its persistence.
//!
//! Loading never fails: an absent or corrupt document is replaced with the
//! defaults and written back. Every mutation is persisted immediately.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::{ConfigStore, TemplateSettings},
    domain::{AuthorIdentity, ConfigDocument, DomainError, SpecRepoUrl, keys, merge},
    error::PodsmithResult,
};

/// Editor used when neither the config nor the environment names one.
pub const FALLBACK_EDITOR: &str = "vi";

pub struct ConfigService {
    store: Box<dyn ConfigStore>,
    document: ConfigDocument,
}

impl ConfigService {
    /// Load the document, healing it against the defaults.
    #[instrument(skip_all, fields(path = %store.location().display()))]
    pub fn load(store: Box<dyn ConfigStore>) -> Self {
        let document = Self::read_healed(store.as_ref());
        Self { store, document }
    }

    fn read_healed(store: &dyn ConfigStore) -> ConfigDocument {
        let (document, dirty) = match store.load() {
            Ok(Some(stored)) => {
                let mut healed = ConfigDocument::with_defaults(&stored);
                let cleared = healed.clear_dangling_default();
                if cleared {
                    warn!("Default spec repository pointed at a missing entry; cleared");
                }
                let dirty = cleared || healed != stored;
                (healed, dirty)
            }
            Ok(None) => {
                info!("No configuration found, writing defaults");
                (ConfigDocument::defaults(), true)
            }
            Err(e) => {
                warn!(error = %e, "Configuration unreadable, falling back to defaults");
                (ConfigDocument::defaults(), true)
            }
        };

        if dirty {
            if let Err(e) = store.save(&document) {
                warn!(error = %e, "Could not persist configuration");
            }
        }
        document
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn location(&self) -> PathBuf {
        self.store.location()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.document.get(key)
    }

    /// Set a dotted key and persist.
    ///
    /// The default spec repository must name a registered repository: naming
    /// an unknown one fails, and a write that unregisters the default clears it.
    #[instrument(skip(self, value))]
    pub fn set(&mut self, key: &str, value: Value) -> PodsmithResult<()> {
        if key == keys::DEFAULT_SPEC_REPO {
            if let Some(name) = value.as_str() {
                return self.set_default_spec_repo(name);
            }
        }
        self.document.set(key, value)?;
        if self.document.clear_dangling_default() {
            warn!(key, "Default spec repository is no longer registered; cleared");
        }
        self.persist()
    }

    /// Replace everything with the defaults.
    pub fn reset(&mut self) -> PodsmithResult<()> {
        info!("Resetting configuration to defaults");
        self.document = ConfigDocument::defaults();
        self.persist()
    }

    /// Deep-merge `other` over the current document.
    pub fn import(&mut self, other: &ConfigDocument) -> PodsmithResult<()> {
        let merged = merge(&self.document.to_value(), &other.to_value());
        if let Some(doc) = ConfigDocument::from_value(merged) {
            self.document = doc;
            self.document.clear_dangling_default();
        }
        self.persist()
    }

    /// Re-read from the store, e.g. after an external edit.
    pub fn reload(&mut self) {
        self.document = Self::read_healed(self.store.as_ref());
    }

    // ── Typed accessors ──────────────────────────────────────────────────────

    pub fn identity(&self) -> AuthorIdentity {
        self.document.identity()
    }

    pub fn template_settings(&self) -> TemplateSettings {
        TemplateSettings::from_document(&self.document)
    }

    pub fn git_remote(&self) -> String {
        self.document
            .get_str(keys::GIT_REMOTE)
            .unwrap_or("origin")
            .to_string()
    }

    /// Configured editor, else `$VISUAL`, else `$EDITOR`, else `vi`.
    pub fn editor(&self, env: impl Fn(&str) -> Option<String>) -> String {
        self.document
            .get_str(keys::EDITOR)
            .filter(|e| !e.trim().is_empty())
            .map(String::from)
            .or_else(|| env("VISUAL"))
            .or_else(|| env("EDITOR"))
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
    }

    // ── Spec repositories ────────────────────────────────────────────────────

    pub fn spec_repos(&self) -> BTreeMap<String, String> {
        self.document.spec_repos()
    }

    pub fn default_spec_repo(&self) -> Option<&str> {
        self.document.default_spec_repo()
    }

    /// Register a repository. Returns `true` if it became the default.
    #[instrument(skip(self))]
    pub fn add_spec_repo(&mut self, name: &str, url: &str) -> PodsmithResult<bool> {
        let url = SpecRepoUrl::parse(url)?;
        let became_default = self.document.add_spec_repo(name, &url)?;
        self.persist()?;
        Ok(became_default)
    }

    /// Unregister a repository. Returns `true` if it was the default.
    #[instrument(skip(self))]
    pub fn remove_spec_repo(&mut self, name: &str) -> PodsmithResult<bool> {
        let was_default = self.document.remove_spec_repo(name)?;
        self.persist()?;
        Ok(was_default)
    }

    pub fn set_default_spec_repo(&mut self, name: &str) -> PodsmithResult<()> {
        self.document.set_default_spec_repo(name)?;
        self.persist()
    }

    /// `(name, url)` of `requested`, or of the default when `None`.
    pub fn resolve_spec_repo(&self, requested: Option<&str>) -> PodsmithResult<(String, String)> {
        let name = match requested {
            Some(name) => name,
            None => self
                .document
                .default_spec_repo()
                .ok_or(DomainError::NoDefaultSpecRepo)?,
        };
        let url = self
            .document
            .spec_repo_url(name)
            .ok_or_else(|| DomainError::UnknownSpecRepo { name: name.into() })?;
        Ok((name.to_string(), url.to_string()))
    }

    fn persist(&self) -> PodsmithResult<()> {
        debug!("Persisting configuration");
        self.store.save(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ApplicationError, ports::MockConfigStore};
    use crate::error::PodsmithError;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const SPECS_URL: &str = "git@host:Specs.git";
    const OTHER_URL: &str = "https://host/Other.git";

    fn store_returning(
        loaded: PodsmithResult<Option<ConfigDocument>>,
        expected_saves: usize,
    ) -> MockConfigStore {
        let mut store = MockConfigStore::new();
        store
            .expect_location()
            .returning(|| PathBuf::from("/home/u/.config/podsmith/config.json"));
        store.expect_load().return_once(move || loaded);
        store
            .expect_save()
            .times(expected_saves)
            .returning(|_| Ok(()));
        store
    }

    #[test]
    fn absent_document_is_written_with_defaults() {
        let service = ConfigService::load(Box::new(store_returning(Ok(None), 1)));
        assert_eq!(service.document(), &ConfigDocument::defaults());
    }

    #[test]
    fn corrupt_document_falls_back_to_defaults() {
        let corrupt = Err(PodsmithError::Application(ApplicationError::CorruptConfig {
            path: "config.json".into(),
            reason: "expected value at line 1".into(),
        }));
        let service = ConfigService::load(Box::new(store_returning(corrupt, 1)));
        assert_eq!(service.git_remote(), "origin");
    }

    #[test]
    fn complete_document_is_not_rewritten() {
        let mut stored = ConfigDocument::defaults();
        stored.set(keys::AUTHOR, json!("Jane")).unwrap();
        let service = ConfigService::load(Box::new(store_returning(Ok(Some(stored)), 0)));
        assert_eq!(service.identity().author, "Jane");
    }

    #[test]
    fn partial_document_is_healed_and_saved() {
        let stored = ConfigDocument::from_value(json!({"author": "Jane"})).unwrap();
        let service = ConfigService::load(Box::new(store_returning(Ok(Some(stored)), 1)));
        assert_eq!(service.identity().author, "Jane");
        assert_eq!(service.template_settings().name, "NBTemplateModule");
    }

    #[test]
    fn save_failure_on_load_is_not_fatal() {
        let mut store = MockConfigStore::new();
        store
            .expect_location()
            .returning(|| PathBuf::from("/ro/config.json"));
        store.expect_load().returning(|| Ok(None));
        store.expect_save().returning(|_| {
            Err(ApplicationError::FilesystemError {
                path: "/ro/config.json".into(),
                reason: "read-only".into(),
            }
            .into())
        });
        let service = ConfigService::load(Box::new(store));
        assert_eq!(service.document(), &ConfigDocument::defaults());
    }

    #[test]
    fn every_set_persists() {
        let mut service = ConfigService::load(Box::new(store_returning(Ok(None), 3)));
        service.set("author", json!("Jane")).unwrap();
        service.set("git.remote", json!("upstream")).unwrap();
        assert_eq!(service.git_remote(), "upstream");
    }

    #[test]
    fn repo_registry_round() {
        let mut service = ConfigService::load(Box::new(store_returning(Ok(None), 4)));
        assert!(service.add_spec_repo("Specs", SPECS_URL).unwrap());
        assert!(!service.add_spec_repo("Other", OTHER_URL).unwrap());
        assert!(service.remove_spec_repo("Specs").unwrap());
        assert_eq!(service.default_spec_repo(), None);
        assert!(matches!(
            service.resolve_spec_repo(None),
            Err(PodsmithError::Domain(DomainError::NoDefaultSpecRepo))
        ));
        assert_eq!(
            service.resolve_spec_repo(Some("Other")).unwrap(),
            ("Other".to_string(), OTHER_URL.to_string())
        );
    }

    /// Store that records every saved document.
    fn recording_store(saved: Arc<Mutex<Vec<ConfigDocument>>>) -> MockConfigStore {
        let mut store = MockConfigStore::new();
        store
            .expect_location()
            .returning(|| PathBuf::from("/home/u/.config/podsmith/config.json"));
        store.expect_load().returning(|| Ok(None));
        store.expect_save().returning(move |doc| {
            saved.lock().unwrap().push(doc.clone());
            Ok(())
        });
        store
    }

    #[test]
    fn set_rejects_unregistered_default() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let mut service = ConfigService::load(Box::new(recording_store(saved.clone())));
        service.add_spec_repo("Specs", SPECS_URL).unwrap();
        let writes = saved.lock().unwrap().len();

        assert!(matches!(
            service.set(keys::DEFAULT_SPEC_REPO, json!("Ghost")),
            Err(PodsmithError::Domain(DomainError::UnknownSpecRepo { .. }))
        ));
        assert_eq!(service.default_spec_repo(), Some("Specs"));
        assert_eq!(saved.lock().unwrap().len(), writes);

        service
            .set(keys::DEFAULT_SPEC_REPO, json!("Specs"))
            .unwrap();
        let last = saved.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.default_spec_repo(), Some("Specs"));
    }

    #[test]
    fn replacing_registry_clears_stale_default() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let mut service = ConfigService::load(Box::new(recording_store(saved.clone())));
        service.add_spec_repo("Specs", SPECS_URL).unwrap();

        service.set(keys::SPEC_REPOS, json!({})).unwrap();

        assert_eq!(service.default_spec_repo(), None);
        let last = saved.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.default_spec_repo(), None);
        assert!(service.spec_repos().is_empty());
        assert!(
            service
                .set(keys::DEFAULT_SPEC_REPO, json!("Specs"))
                .is_err()
        );
    }

    #[test]
    fn default_can_be_unset_with_null() {
        let mut service = ConfigService::load(Box::new(store_returning(Ok(None), 3)));
        service.add_spec_repo("Specs", SPECS_URL).unwrap();
        service.set(keys::DEFAULT_SPEC_REPO, Value::Null).unwrap();
        assert_eq!(service.default_spec_repo(), None);
        assert_eq!(service.spec_repos().len(), 1);
    }

    #[test]
    fn invalid_repo_url_is_rejected_without_saving() {
        let mut service = ConfigService::load(Box::new(store_returning(Ok(None), 1)));
        assert!(matches!(
            service.add_spec_repo("Specs", "ftp://host/Specs"),
            Err(PodsmithError::Domain(DomainError::InvalidRepoUrl { .. }))
        ));
    }

    #[test]
    fn editor_falls_back_through_environment() {
        let mut service = ConfigService::load(Box::new(store_returning(Ok(None), 1)));
        assert_eq!(service.editor(|_| None), "vi");

        service.document.set(keys::EDITOR, json!("")).unwrap();
        assert_eq!(
            service.editor(|k| (k == "EDITOR").then(|| "nano".into())),
            "nano"
        );
        assert_eq!(service.editor(|_| Some("code -w".into())), "code -w");
        assert_eq!(service.editor(|_| None), FALLBACK_EDITOR);
    }

    #[test]
    fn import_merges_over_current() {
        let mut service = ConfigService::load(Box::new(store_returning(Ok(None), 2)));
        let incoming =
            ConfigDocument::from_value(json!({"cocoapods": {"template_branch": "dev"}})).unwrap();
        service.import(&incoming).unwrap();
        let settings = service.template_settings();
        assert_eq!(settings.branch, "dev");
        assert_eq!(settings.path, "template");
    }
}
