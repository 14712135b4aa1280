//! Template acquisition into the per-user cache.
//!
//! Three sources, first success wins:
//!
//! 1. a local development copy (`./template`, `../template`, or `template`
//!    next to the installed binary), copied over the cache;
//! 2. the cache itself, unless a refresh was requested;
//! 3. a shallow clone of the configured repository in a scratch directory,
//!    whose template directory replaces the cache.
//!
//! A failed refresh never leaves a partially populated cache behind.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use podsmith_core::{
    application::{
        ApplicationError,
        ports::{
            AcquiredTemplate, CommandRunner, Filesystem, TemplateOrigin, TemplateSettings,
            TemplateSource,
        },
    },
    domain::git,
    error::PodsmithResult,
};

/// Name of the directory searched for a local development template.
pub const LOCAL_TEMPLATE_DIR: &str = "template";

pub struct TemplateAcquirer {
    settings: TemplateSettings,
    cache_dir: PathBuf,
    local_candidates: Vec<PathBuf>,
    fs: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
}

impl TemplateAcquirer {
    pub fn new(
        settings: TemplateSettings,
        cache_dir: impl Into<PathBuf>,
        fs: Box<dyn Filesystem>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            settings,
            cache_dir: cache_dir.into(),
            local_candidates: Vec::new(),
            fs,
            runner,
        }
    }

    /// Directories checked for a local development template, in order.
    pub fn with_local_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.local_candidates = candidates;
        self
    }

    /// `<cwd>/template`, `<cwd>/../template`, `<exe dir>/../template`.
    pub fn default_local_candidates(cwd: &Path, exe: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = vec![cwd.join(LOCAL_TEMPLATE_DIR)];
        if let Some(parent) = cwd.parent() {
            candidates.push(parent.join(LOCAL_TEMPLATE_DIR));
        }
        if let Some(install_root) = exe.and_then(Path::parent).and_then(Path::parent) {
            candidates.push(install_root.join(LOCAL_TEMPLATE_DIR));
        }
        candidates
    }

    fn payload_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.settings.name)
    }

    fn acquired(&self, origin: TemplateOrigin) -> AcquiredTemplate {
        AcquiredTemplate {
            payload_dir: self.payload_in(&self.cache_dir),
            token: self.settings.name.clone(),
            origin,
        }
    }

    /// The cache itself never counts as a local template.
    fn local_template(&self) -> Option<&Path> {
        self.local_candidates
            .iter()
            .filter(|c| **c != self.cache_dir)
            .find(|c| self.fs.is_dir(&self.payload_in(c)))
            .map(PathBuf::as_path)
    }

    /// Replace the cache with a copy of `source`.
    fn populate_cache(&self, source: &Path) -> PodsmithResult<()> {
        if self.fs.exists(&self.cache_dir) {
            self.fs.remove_dir_all(&self.cache_dir)?;
        }
        if let Err(e) = self.fs.copy_dir_all(source, &self.cache_dir) {
            self.discard_cache();
            return Err(e);
        }
        Ok(())
    }

    fn discard_cache(&self) {
        if !self.fs.exists(&self.cache_dir) {
            return;
        }
        if let Err(e) = self.fs.remove_dir_all(&self.cache_dir) {
            warn!(error = %e, path = %self.cache_dir.display(), "Could not remove partial cache");
        }
    }

    #[instrument(skip(self), fields(repo = %self.settings.repo, branch = %self.settings.branch))]
    fn clone_remote(&self) -> PodsmithResult<()> {
        if self.settings.repo.is_empty() {
            return Err(unavailable("no template repository configured"));
        }

        let scratch = tempfile::Builder::new()
            .prefix("podsmith-template-")
            .tempdir()
            .map_err(|e| unavailable(format!("cannot create scratch directory: {e}")))?;
        let checkout_dir = scratch.path().join("repo");

        info!("Cloning template repository");
        let clone = git::shallow_clone(&self.settings.repo, &checkout_dir.to_string_lossy());
        let output = self.runner.run(&clone)?;
        if !output.success() {
            return Err(unavailable(format!("git clone failed: {}", output.stderr.trim())));
        }

        let checkout = git::checkout(&self.settings.branch).current_dir(&checkout_dir);
        let output = self.runner.run(&checkout)?;
        if !output.success() {
            warn!(
                branch = %self.settings.branch,
                stderr = output.stderr.trim(),
                "Branch checkout failed, using the default branch"
            );
        }

        let source = checkout_dir.join(&self.settings.path);
        if !self.fs.is_dir(&self.payload_in(&source)) {
            return Err(unavailable(format!(
                "'{}/{}' not found in {}",
                self.settings.path, self.settings.name, self.settings.repo
            )));
        }
        self.populate_cache(&source)
        // `scratch` is removed on drop.
    }
}

impl TemplateSource for TemplateAcquirer {
    #[instrument(skip(self), fields(cache = %self.cache_dir.display()))]
    fn acquire(&self, refresh: bool) -> PodsmithResult<AcquiredTemplate> {
        if let Some(local) = self.local_template() {
            info!(source = %local.display(), "Using local development template");
            self.populate_cache(local)?;
            return Ok(self.acquired(TemplateOrigin::LocalDev));
        }

        if !refresh && self.fs.is_dir(&self.payload_in(&self.cache_dir)) {
            debug!("Using cached template");
            return Ok(self.acquired(TemplateOrigin::Cache));
        }

        self.clone_remote()?;
        Ok(self.acquired(TemplateOrigin::Remote))
    }

    fn list_cached(&self) -> PodsmithResult<Vec<String>> {
        if !self.fs.is_dir(&self.cache_dir) {
            return Ok(Vec::new());
        }
        Ok(self
            .fs
            .list_dir(&self.cache_dir)?
            .into_iter()
            .filter(|p| self.fs.is_dir(p))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect())
    }

    fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone()
    }
}

fn unavailable(reason: impl Into<String>) -> podsmith_core::error::PodsmithError {
    ApplicationError::TemplateUnavailable {
        reason: reason.into(),
    }
    .into()
}
