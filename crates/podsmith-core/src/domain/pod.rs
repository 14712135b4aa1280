//! `pod` command builders.

use std::path::Path;

use crate::domain::CommandSpec;

pub const POD: &str = "pod";

/// Flags passed to `pod repo push`.
///
/// The five toggles are on unless turned off from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOptions {
    pub allow_warnings: bool,
    pub verbose: bool,
    pub skip_import_validation: bool,
    pub use_libraries: bool,
    pub use_modular_headers: bool,
    pub swift_version: Option<String>,
    pub sources: Vec<String>,
    pub no_overwrite: bool,
    pub local_only: bool,
    pub commit_message: Option<String>,
    pub extra_args: Vec<String>,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            allow_warnings: true,
            verbose: true,
            skip_import_validation: true,
            use_libraries: true,
            use_modular_headers: true,
            swift_version: None,
            sources: Vec::new(),
            no_overwrite: false,
            local_only: false,
            commit_message: None,
            extra_args: Vec::new(),
        }
    }
}

impl PushOptions {
    /// Split a comma-separated `--extra-args` value.
    pub fn parse_extra_args(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        let toggles = [
            (self.allow_warnings, "--allow-warnings"),
            (self.verbose, "--verbose"),
            (self.skip_import_validation, "--skip-import-validation"),
            (self.use_libraries, "--use-libraries"),
            (self.use_modular_headers, "--use-modular-headers"),
        ];
        args.extend(
            toggles
                .iter()
                .filter(|(on, _)| *on)
                .map(|(_, f)| f.to_string()),
        );

        if let Some(version) = &self.swift_version {
            args.extend(["--swift-version".to_string(), version.clone()]);
        }
        for source in &self.sources {
            args.extend(["--sources".to_string(), source.clone()]);
        }
        if self.no_overwrite {
            args.push("--no-overwrite".into());
        }
        if self.local_only {
            args.push("--local-only".into());
        }
        if let Some(message) = &self.commit_message {
            args.extend(["--commit-message".to_string(), message.clone()]);
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// `pod repo push <repo> <podspec> <flags…>` with the repository URL added to
/// the sources.
pub fn build_push_command(
    repo_name: &str,
    podspec: &Path,
    options: &PushOptions,
    repo_url: &str,
) -> CommandSpec {
    let mut options = options.clone();
    if !options.sources.iter().any(|s| s == repo_url) {
        options.sources.push(repo_url.to_string());
    }
    CommandSpec::new(POD)
        .args(["repo", "push", repo_name])
        .arg(podspec.to_string_lossy())
        .args(options.to_args())
}

/// `pod spec lint --quick <podspec>`
pub fn lint_command(podspec: &Path) -> CommandSpec {
    CommandSpec::new(POD)
        .args(["spec", "lint", "--quick"])
        .arg(podspec.to_string_lossy())
}

pub fn is_podspec_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".podspec") || n.ends_with(".podspec.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags() {
        assert_eq!(
            PushOptions::default().to_args(),
            vec![
                "--allow-warnings",
                "--verbose",
                "--skip-import-validation",
                "--use-libraries",
                "--use-modular-headers",
            ]
        );
    }

    #[test]
    fn push_command_adds_repo_url_as_source() {
        let options = PushOptions {
            verbose: false,
            use_libraries: false,
            swift_version: Some("5.0".into()),
            local_only: true,
            extra_args: PushOptions::parse_extra_args("--no-clean, --skip-tests"),
            ..PushOptions::default()
        };
        let cmd = build_push_command(
            "MySpecs",
            Path::new("MyLib.podspec"),
            &options,
            "git@host:Specs.git",
        );
        assert_eq!(
            cmd.to_string(),
            "pod repo push MySpecs MyLib.podspec --allow-warnings --skip-import-validation \
             --use-modular-headers --swift-version 5.0 --sources git@host:Specs.git \
             --local-only --no-clean --skip-tests"
        );
    }

    #[test]
    fn repo_url_is_not_duplicated() {
        let options = PushOptions {
            sources: vec!["https://cdn.cocoapods.org/".into(), "git@host:Specs.git".into()],
            ..PushOptions::default()
        };
        let cmd = build_push_command("S", Path::new("a.podspec"), &options, "git@host:Specs.git");
        let repo_urls = cmd.args.iter().filter(|a| *a == "git@host:Specs.git");
        assert_eq!(repo_urls.count(), 1);
    }

    #[test]
    fn podspec_detection() {
        assert!(is_podspec_path(Path::new("MyLib.podspec")));
        assert!(is_podspec_path(Path::new("dir/MyLib.podspec.json")));
        assert!(!is_podspec_path(Path::new("MyLib.json")));
    }
}
