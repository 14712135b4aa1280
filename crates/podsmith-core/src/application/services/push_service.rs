//! Push Service - publish a podspec to a spec repository.
//!
//! Interactive decisions (which podspec, continue after a lint failure) stay
//! with the caller; this service finds, validates, lints and pushes.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem},
        services::tag_service::failure,
    },
    domain::{CommandOutput, CommandSpec, PushOptions, pod},
    error::PodsmithResult,
};

/// A resolved push: what goes where, with which flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPlan {
    pub repo_name: String,
    pub repo_url: String,
    pub podspec: PathBuf,
    pub command: CommandSpec,
}

impl PushPlan {
    pub fn new(
        repo_name: String,
        repo_url: String,
        podspec: PathBuf,
        options: &PushOptions,
    ) -> Self {
        let command = pod::build_push_command(&repo_name, &podspec, options, &repo_url);
        Self {
            repo_name,
            repo_url,
            podspec,
            command,
        }
    }
}

pub struct PushService {
    runner: Box<dyn CommandRunner>,
    filesystem: Box<dyn Filesystem>,
}

impl PushService {
    pub fn new(runner: Box<dyn CommandRunner>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { runner, filesystem }
    }

    /// `*.podspec` files in `dir`, then `*.podspec.json` files.
    pub fn find_podspecs(&self, dir: &Path) -> PodsmithResult<Vec<PathBuf>> {
        let entries = self.filesystem.list_dir(dir)?;
        let with_suffix = |suffix: &str| {
            entries
                .iter()
                .filter(|p| !self.filesystem.is_dir(p))
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(suffix))
                })
                .cloned()
                .collect::<Vec<_>>()
        };

        let mut found = with_suffix(".podspec");
        found.extend(with_suffix(".podspec.json"));
        if found.is_empty() {
            return Err(ApplicationError::NoPodspecFound {
                dir: dir.to_path_buf(),
            }
            .into());
        }
        Ok(found)
    }

    /// Check the podspec exists. Returns whether it has a podspec extension.
    pub fn validate(&self, podspec: &Path) -> PodsmithResult<bool> {
        if !self.filesystem.exists(podspec) || self.filesystem.is_dir(podspec) {
            return Err(ApplicationError::PodspecNotFound {
                path: podspec.to_path_buf(),
            }
            .into());
        }
        let recognised = pod::is_podspec_path(podspec);
        if !recognised {
            warn!(podspec = %podspec.display(), "File does not look like a podspec");
        }
        Ok(recognised)
    }

    /// `pod spec lint --quick`. A failing lint is returned, not raised.
    #[instrument(skip(self))]
    pub fn lint(&self, podspec: &Path) -> PodsmithResult<CommandOutput> {
        let output = self.runner.run(&pod::lint_command(podspec))?;
        if output.success() {
            info!("Podspec lint passed");
        } else {
            warn!(status = ?output.status, "Podspec lint failed");
        }
        Ok(output)
    }

    /// Run the push with output streamed to the terminal.
    #[instrument(skip_all, fields(repo = %plan.repo_name, podspec = %plan.podspec.display()))]
    pub fn push(&self, plan: &PushPlan) -> PodsmithResult<CommandOutput> {
        info!(command = %plan.command, "Pushing podspec");
        let output = self.runner.stream(&plan.command)?;
        if !output.success() {
            return Err(failure(&plan.command, &output).into());
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockCommandRunner, MockFilesystem};

    fn listing(names: &'static [&'static str]) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_list_dir()
            .returning(move |dir| Ok(names.iter().map(|n| dir.join(n)).collect()));
        fs.expect_is_dir().returning(|p| p.extension().is_none());
        fs
    }

    #[test]
    fn podspecs_before_json_podspecs() {
        let fs = listing(&["B.podspec.json", "README.md", "A.podspec", "Sources"]);
        let service = PushService::new(Box::new(MockCommandRunner::new()), Box::new(fs));
        let found = service.find_podspecs(Path::new("/repo")).unwrap();
        assert_eq!(
            found,
            vec![PathBuf::from("/repo/A.podspec"), PathBuf::from("/repo/B.podspec.json")]
        );
    }

    #[test]
    fn no_podspec_is_an_error() {
        let fs = listing(&["README.md"]);
        let service = PushService::new(Box::new(MockCommandRunner::new()), Box::new(fs));
        assert!(matches!(
            service.find_podspecs(Path::new("/repo")),
            Err(crate::error::PodsmithError::Application(
                ApplicationError::NoPodspecFound { .. }
            ))
        ));
    }

    #[test]
    fn validate_flags_unusual_extensions() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_is_dir().return_const(false);
        let service = PushService::new(Box::new(MockCommandRunner::new()), Box::new(fs));
        assert!(service.validate(Path::new("MyLib.podspec")).unwrap());
        assert!(!service.validate(Path::new("MyLib.rb")).unwrap());
    }

    #[test]
    fn push_failure_carries_status() {
        let mut runner = MockCommandRunner::new();
        runner.expect_stream().returning(|_| {
            Ok(CommandOutput {
                status: Some(1),
                stderr: "[!] The repo `Specs` is not clean".into(),
                ..CommandOutput::default()
            })
        });
        let service = PushService::new(Box::new(runner), Box::new(MockFilesystem::new()));
        let plan = PushPlan::new(
            "Specs".into(),
            "git@host:Specs.git".into(),
            "MyLib.podspec".into(),
            &PushOptions::default(),
        );
        let err = service.push(&plan).unwrap_err();
        assert!(err.to_string().contains("exit 1"));
        assert!(err.to_string().contains("not clean"));
    }
}
