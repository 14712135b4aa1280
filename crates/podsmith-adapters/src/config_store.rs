//! Configuration persistence adapters.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use podsmith_core::{
    application::{ApplicationError, ports::ConfigStore},
    domain::ConfigDocument,
    error::PodsmithResult,
};

use crate::filesystem::map_io_error;

/// Pretty-printed JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn load(&self) -> PodsmithResult<Option<ConfigDocument>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(map_io_error(&self.path, e, "read configuration")),
        };
        parse_document(&self.path, &raw).map(Some)
    }

    fn save(&self, document: &ConfigDocument) -> PodsmithResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        let mut body = document.to_pretty_json();
        body.push('\n');
        std::fs::write(&self.path, body)
            .map_err(|e| map_io_error(&self.path, e, "write configuration"))?;
        debug!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}

/// Parse a JSON document that must be an object.
pub fn parse_document(path: &Path, raw: &str) -> PodsmithResult<ConfigDocument> {
    let corrupt = |reason: String| ApplicationError::CorruptConfig {
        path: path.to_path_buf(),
        reason,
    };
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| corrupt(e.to_string()))?;
    ConfigDocument::from_value(value)
        .ok_or_else(|| corrupt("top-level value is not an object".into()).into())
}

/// Keeps the document in memory (testing).
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    document: Arc<Mutex<Option<ConfigDocument>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: ConfigDocument) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(document))),
        }
    }

    /// The last saved document.
    pub fn saved(&self) -> Option<ConfigDocument> {
        self.document.lock().ok().and_then(|d| d.clone())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> PodsmithResult<Option<ConfigDocument>> {
        let guard = self
            .document
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(guard.clone())
    }

    fn save(&self, document: &ConfigDocument) -> PodsmithResult<()> {
        let mut guard = self
            .document
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;
        *guard = Some(document.clone());
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podsmith_core::application::ConfigService;
    use podsmith_core::domain::keys;
    use serde_json::json;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::new(dir.path().join("config.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::new(dir.path().join("nested/podsmith/config.json"));
        store.save(&ConfigDocument::defaults()).unwrap();
        assert_eq!(store.load().unwrap(), Some(ConfigDocument::defaults()));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileConfigStore::new(&path).load().is_err());

        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(JsonFileConfigStore::new(&path).load().is_err());
    }

    #[test]
    fn corrupt_file_is_replaced_with_defaults_on_service_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "garbage").unwrap();

        let service = ConfigService::load(Box::new(JsonFileConfigStore::new(&path)));
        assert_eq!(service.document(), &ConfigDocument::defaults());

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("NBTemplateModule"));
    }

    #[test]
    fn operator_values_survive_healing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"author": "Jane", "cocoapods": {"template_branch": "dev"}}"#,
        )
        .unwrap();

        let service = ConfigService::load(Box::new(JsonFileConfigStore::new(&path)));
        assert_eq!(service.get(keys::AUTHOR), Some(&json!("Jane")));
        assert_eq!(service.get(keys::TEMPLATE_BRANCH), Some(&json!("dev")));
        assert_eq!(service.get(keys::TEMPLATE_PATH), Some(&json!("template")));

        let reloaded = JsonFileConfigStore::new(&path).load().unwrap().unwrap();
        assert_eq!(
            reloaded.get_str(keys::TEMPLATE_NAME),
            Some("NBTemplateModule")
        );
    }
}
