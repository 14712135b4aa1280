//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `podsmith-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{CommandOutput, CommandSpec, ConfigDocument, DEFAULT_TEMPLATE_NAME, keys};
use crate::error::PodsmithResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `podsmith_adapters::filesystem::LocalFilesystem` (production)
/// - `podsmith_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PodsmithResult<()>;

    /// Recursively copy `from` to `to`. `to` must not exist yet.
    fn copy_dir_all(&self, from: &Path, to: &Path) -> PodsmithResult<()>;

    /// Every entry under `root` (excluding `root`), children before parents.
    ///
    /// `.git` directories are not descended into.
    fn entries_deepest_first(&self, root: &Path) -> PodsmithResult<Vec<PathBuf>>;

    /// Every regular file under `root`, skipping `.git` directories.
    fn files(&self, root: &Path) -> PodsmithResult<Vec<PathBuf>>;

    /// Direct children of `dir`, sorted.
    fn list_dir(&self, dir: &Path) -> PodsmithResult<Vec<PathBuf>>;

    fn rename(&self, from: &Path, to: &Path) -> PodsmithResult<()>;

    fn read(&self, path: &Path) -> PodsmithResult<Vec<u8>>;

    fn write(&self, path: &Path, content: &[u8]) -> PodsmithResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> PodsmithResult<()>;

    fn remove_file(&self, path: &Path) -> PodsmithResult<()>;
}

/// Port for running external programs (`git`, `pod`, the editor).
///
/// A non-zero exit is reported through [`CommandOutput::status`]; `Err` means
/// the program could not be started at all.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run to completion with both streams captured.
    fn run(&self, command: &CommandSpec) -> PodsmithResult<CommandOutput>;

    /// Run to completion, echoing output live while capturing it line by line.
    fn stream(&self, command: &CommandSpec) -> PodsmithResult<CommandOutput>;

    /// Run with the terminal attached (interactive programs).
    fn run_attached(&self, command: &CommandSpec) -> PodsmithResult<Option<i32>>;
}

/// Port for persisting the configuration document.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore: Send + Sync {
    /// `Ok(None)` when nothing is stored yet; `Err` when stored data is
    /// unreadable or corrupt.
    fn load(&self) -> PodsmithResult<Option<ConfigDocument>>;

    /// Replace the stored document.
    fn save(&self, document: &ConfigDocument) -> PodsmithResult<()>;

    /// Where the document lives, for display.
    fn location(&self) -> PathBuf;
}

/// Port for obtaining a local copy of the project template.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateSource: Send + Sync {
    /// Make the template payload available locally.
    ///
    /// `refresh` skips the cached copy.
    fn acquire(&self, refresh: bool) -> PodsmithResult<AcquiredTemplate>;

    /// Names of the template directories currently cached.
    fn list_cached(&self) -> PodsmithResult<Vec<String>>;

    fn cache_dir(&self) -> PathBuf;
}

/// Where the template comes from and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSettings {
    /// Placeholder token and payload directory name.
    pub name: String,
    pub repo: String,
    pub branch: String,
    /// Directory inside the repository holding the payload.
    pub path: String,
}

impl TemplateSettings {
    pub fn from_document(doc: &ConfigDocument) -> Self {
        let read = |key: &str, fallback: &str| {
            doc.get_str(key)
                .filter(|s| !s.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        Self {
            name: read(keys::TEMPLATE_NAME, DEFAULT_TEMPLATE_NAME),
            repo: read(keys::TEMPLATE_REPO, ""),
            branch: read(keys::TEMPLATE_BRANCH, "main"),
            path: read(keys::TEMPLATE_PATH, "template"),
        }
    }
}

/// Which acquisition path produced the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateOrigin {
    LocalDev,
    Cache,
    Remote,
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LocalDev => "local development copy",
            Self::Cache => "cache",
            Self::Remote => "remote repository",
        })
    }
}

/// A template payload ready to be materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredTemplate {
    /// The placeholder-named payload directory.
    pub payload_dir: PathBuf,
    /// Token to replace with the module name.
    pub token: String,
    pub origin: TemplateOrigin,
}
