//! Git command builders and tag plans.
//!
//! A [`TagPlan`] is the ordered list of git invocations for `tag create` or
//! `tag retag`. Running it is the job of `TagService`; building it is pure.

use crate::domain::{CommandSpec, TagName};

pub const GIT: &str = "git";

/// `git rev-parse --git-dir`, which fails outside a repository.
pub fn rev_parse_git_dir() -> CommandSpec {
    CommandSpec::new(GIT).args(["rev-parse", "--git-dir"])
}

/// `git clone --depth 1 --no-single-branch <url> <dest>`
pub fn shallow_clone(url: &str, dest: &str) -> CommandSpec {
    CommandSpec::new(GIT).args(["clone", "--depth", "1", "--no-single-branch", url, dest])
}

pub fn checkout(branch: &str) -> CommandSpec {
    CommandSpec::new(GIT).args(["checkout", branch])
}

/// What a step in a [`TagPlan`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    DeleteLocal,
    DeleteRemote,
    Create,
    Push,
    PushTags,
}

impl StepKind {
    pub fn describe(self) -> &'static str {
        match self {
            Self::DeleteLocal => "Delete local tag",
            Self::DeleteRemote => "Delete remote tag",
            Self::Create => "Create tag",
            Self::Push => "Push tag",
            Self::PushTags => "Push tags",
        }
    }

    /// Lower-cased stderr fragments meaning "the tag was already absent".
    pub fn missing_markers(self) -> &'static [&'static str] {
        match self {
            Self::DeleteLocal => &["not found"],
            Self::DeleteRemote => &["unable to delete", "does not exist"],
            _ => &[],
        }
    }

    /// Whether `stderr` reports an absent tag for this step.
    pub fn is_missing_tag(self, stderr: &str) -> bool {
        let stderr = stderr.to_lowercase();
        self.missing_markers().iter().any(|m| stderr.contains(m))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitStep {
    pub kind: StepKind,
    pub command: CommandSpec,
}

/// Parameters shared by tag creation and re-creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    pub tag: TagName,
    /// Commit to tag; `None` or `HEAD` tags the current commit.
    pub commit: Option<String>,
    /// Annotation message; makes the tag annotated.
    pub message: Option<String>,
    pub remote: String,
}

impl TagRequest {
    pub fn new(tag: TagName, remote: impl Into<String>) -> Self {
        Self {
            tag,
            commit: None,
            message: None,
            remote: remote.into(),
        }
    }

    pub fn with_commit(mut self, commit: Option<String>) -> Self {
        self.commit = commit;
        self
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    fn create_step(&self) -> GitStep {
        let tag = self.tag.as_str();
        let mut cmd = CommandSpec::new(GIT).arg("tag");
        cmd = match self.message.as_deref().filter(|m| !m.is_empty()) {
            Some(message) => cmd.args(["-a", tag, "-m", message]),
            None => cmd.arg(tag),
        };
        if let Some(commit) = self
            .commit
            .as_deref()
            .filter(|c| *c != "HEAD" && !c.is_empty())
        {
            cmd = cmd.arg(commit);
        }
        GitStep {
            kind: StepKind::Create,
            command: cmd,
        }
    }
}

/// Ordered git steps for a tag operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPlan {
    pub steps: Vec<GitStep>,
}

impl TagPlan {
    /// `git tag`, then `git push <remote> <tag>` unless `push` is false.
    pub fn create(request: &TagRequest, push: bool) -> Self {
        let mut steps = vec![request.create_step()];
        if push {
            steps.push(GitStep {
                kind: StepKind::Push,
                command: CommandSpec::new(GIT).args([
                    "push",
                    request.remote.as_str(),
                    request.tag.as_str(),
                ]),
            });
        }
        Self { steps }
    }

    /// Delete locally, delete remotely, create, push all tags.
    pub fn retag(request: &TagRequest) -> Self {
        let tag = request.tag.as_str();
        let remote = request.remote.as_str();
        Self {
            steps: vec![
                GitStep {
                    kind: StepKind::DeleteLocal,
                    command: CommandSpec::new(GIT).args(["tag", "-d", tag]),
                },
                GitStep {
                    kind: StepKind::DeleteRemote,
                    command: CommandSpec::new(GIT)
                        .args(["push", remote])
                        .arg(format!(":refs/tags/{tag}")),
                },
                request.create_step(),
                GitStep {
                    kind: StepKind::PushTags,
                    command: CommandSpec::new(GIT).args(["push", "--tags", remote]),
                },
            ],
        }
    }
}
