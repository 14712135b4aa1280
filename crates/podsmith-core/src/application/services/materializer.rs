//! Materializer - turns a template payload into a named project.
//!
//! The payload is copied into a staging directory beside the destination and
//! every pass runs there. Only a fully processed tree is renamed into place,
//! so a failure never leaves a half-built project at the final path.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        AuthorIdentity, ManifestFields, ModuleName, Substitution, patch_podspec,
        substitution::{self, EXAMPLE_DIR},
    },
    error::PodsmithResult,
};

const STAGING_PREFIX: &str = ".podsmith-staging-";

/// What a materialization did, for the summary and the JSON report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
    pub project_dir: PathBuf,
    /// `(old name, new name)` relative to the project root.
    pub renamed: Vec<(PathBuf, PathBuf)>,
    pub substituted: Vec<PathBuf>,
    /// Files whose contents could not be processed.
    pub skipped: Vec<PathBuf>,
    pub example_removed: bool,
    pub manifest_patched: bool,
    pub cleaned: Vec<PathBuf>,
}

/// Inputs of one materialization.
#[derive(Debug, Clone)]
pub struct MaterializeJob<'a> {
    pub payload_dir: &'a Path,
    pub token: &'a str,
    pub module: &'a ModuleName,
    pub output_dir: &'a Path,
    pub include_example: bool,
    pub identity: &'a AuthorIdentity,
}

pub struct Materializer<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> Materializer<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    /// Final location of the project.
    pub fn target(output_dir: &Path, module: &ModuleName) -> PathBuf {
        output_dir.join(module.as_str())
    }

    #[instrument(
        skip_all,
        fields(module = %job.module, token = job.token, payload = %job.payload_dir.display())
    )]
    pub fn materialize(&self, job: &MaterializeJob<'_>) -> PodsmithResult<MaterializeReport> {
        let target = Self::target(job.output_dir, job.module);
        if self.fs.exists(&target) {
            return Err(ApplicationError::ProjectExists { path: target }.into());
        }
        if !self.fs.is_dir(job.payload_dir) {
            return Err(ApplicationError::TemplateUnavailable {
                reason: format!("payload directory missing: {}", job.payload_dir.display()),
            }
            .into());
        }

        self.fs.create_dir_all(job.output_dir)?;
        let staging = job
            .output_dir
            .join(format!("{STAGING_PREFIX}{}", uuid::Uuid::new_v4().simple()));

        match self.build(job, &staging) {
            Ok(mut report) => {
                if let Err(e) = self.fs.rename(&staging, &target) {
                    self.discard(&staging);
                    return Err(e);
                }
                report.project_dir = target;
                info!(project = %report.project_dir.display(), "Project materialized");
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Materialization failed, discarding staging directory");
                self.discard(&staging);
                Err(e)
            }
        }
    }

    fn build(&self, job: &MaterializeJob<'_>, root: &Path) -> PodsmithResult<MaterializeReport> {
        let mut report = MaterializeReport::default();
        let module = job.module.as_str();

        self.fs.copy_dir_all(job.payload_dir, root)?;
        self.rename_pass(root, job.token, module, &mut report)?;
        self.substitute_pass(root, job.token, module, &mut report)?;

        if !job.include_example {
            let example = root.join(EXAMPLE_DIR);
            if self.fs.is_dir(&example) {
                self.fs.remove_dir_all(&example)?;
                report.example_removed = true;
                debug!("Removed example project");
            }
        }

        let podspec = root.join(format!("{module}.podspec"));
        if self.fs.exists(&podspec) {
            report.manifest_patched = self.patch_manifest(&podspec, job)?;
        }

        for file in self.fs.files(root)? {
            if substitution::is_backup_file(&file) {
                self.fs.remove_file(&file)?;
                report.cleaned.push(relative(root, &file));
            }
        }

        Ok(report)
    }

    /// Children are visited before their parents, so a directory rename never
    /// invalidates a path that is still pending.
    fn rename_pass(
        &self,
        root: &Path,
        token: &str,
        module: &str,
        report: &mut MaterializeReport,
    ) -> PodsmithResult<()> {
        for entry in self.fs.entries_deepest_first(root)? {
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(new_name) = substitution::renamed(name, token, module) else {
                continue;
            };
            let new_path = entry.with_file_name(&new_name);
            self.fs.rename(&entry, &new_path)?;
            debug!(from = name, to = %new_name, "Renamed");
            report
                .renamed
                .push((relative(root, &entry), relative(root, &new_path)));
        }
        Ok(())
    }

    fn substitute_pass(
        &self,
        root: &Path,
        token: &str,
        module: &str,
        report: &mut MaterializeReport,
    ) -> PodsmithResult<()> {
        for file in self.fs.files(root)? {
            if !substitution::is_substitutable(&file) {
                continue;
            }
            let content = match self.fs.read(&file) {
                Ok(content) => content,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "Skipping unreadable file");
                    report.skipped.push(relative(root, &file));
                    continue;
                }
            };
            let written = match substitution::substitute(&content, token, module) {
                Substitution::Text(text) => self.fs.write(&file, text.as_bytes()),
                Substitution::Bytes(bytes) => self.fs.write(&file, &bytes),
                Substitution::Unchanged => continue,
            };
            match written {
                Ok(()) => report.substituted.push(relative(root, &file)),
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "Skipping unwritable file");
                    report.skipped.push(relative(root, &file));
                }
            }
        }
        Ok(())
    }

    fn patch_manifest(&self, podspec: &Path, job: &MaterializeJob<'_>) -> PodsmithResult<bool> {
        let raw = self.fs.read(podspec)?;
        let Ok(content) = String::from_utf8(raw) else {
            warn!(file = %podspec.display(), "Podspec is not UTF-8, leaving it unpatched");
            return Ok(false);
        };
        let fields = ManifestFields::new(job.module, job.identity);
        let (patched, changed) = patch_podspec(&content, &fields);
        if changed {
            self.fs.write(podspec, patched.as_bytes())?;
        }
        Ok(changed)
    }

    fn discard(&self, staging: &Path) {
        if !self.fs.exists(staging) {
            return;
        }
        if let Err(e) = self.fs.remove_dir_all(staging) {
            warn!(error = %e, path = %staging.display(), "Could not remove staging directory");
        }
    }
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
