//! Tag Service - create and re-create git tags.
//!
//! Runs a [`TagPlan`] step by step and stops at the first failure. Deleting a
//! tag that is already gone only counts as success when forced.

use tracing::{info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::CommandRunner},
    domain::{CommandOutput, CommandSpec, StepKind, TagPlan, TagRequest, git},
    error::PodsmithResult,
};

/// How a plan step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    /// Not run (dry run).
    Planned,
    Succeeded,
    /// Failed because the tag was absent, tolerated by `force`.
    TagMissing { stderr: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub kind: StepKind,
    pub command: CommandSpec,
    pub status: StepStatus,
}

/// Switches shared by `create` and `retag`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagFlags {
    pub dry_run: bool,
    pub force: bool,
}

pub struct TagService {
    runner: Box<dyn CommandRunner>,
}

impl TagService {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Tag a commit and push the tag unless `push` is false.
    #[instrument(skip(self, request), fields(tag = %request.tag, remote = %request.remote))]
    pub fn create(
        &self,
        request: &TagRequest,
        push: bool,
        flags: TagFlags,
    ) -> PodsmithResult<Vec<StepOutcome>> {
        self.ensure_repository()?;
        self.execute(&TagPlan::create(request, push), flags)
    }

    /// Delete the tag locally and remotely, create it again, push all tags.
    #[instrument(skip(self, request), fields(tag = %request.tag, remote = %request.remote))]
    pub fn retag(&self, request: &TagRequest, flags: TagFlags) -> PodsmithResult<Vec<StepOutcome>> {
        self.ensure_repository()?;
        self.execute(&TagPlan::retag(request), flags)
    }

    fn ensure_repository(&self) -> PodsmithResult<()> {
        let output = self.runner.run(&git::rev_parse_git_dir())?;
        if !output.success() {
            return Err(ApplicationError::NotAGitRepository.into());
        }
        Ok(())
    }

    fn execute(&self, plan: &TagPlan, flags: TagFlags) -> PodsmithResult<Vec<StepOutcome>> {
        let mut outcomes = Vec::with_capacity(plan.steps.len());

        for step in &plan.steps {
            info!(step = step.kind.describe(), command = %step.command, "Tag step");
            if flags.dry_run {
                outcomes.push(StepOutcome {
                    kind: step.kind,
                    command: step.command.clone(),
                    status: StepStatus::Planned,
                });
                continue;
            }

            let output = self.runner.run(&step.command)?;
            let status = if output.success() {
                StepStatus::Succeeded
            } else if step.kind.is_missing_tag(&output.stderr) && flags.force {
                warn!(step = step.kind.describe(), "Tag not present, continuing");
                StepStatus::TagMissing {
                    stderr: output.stderr.trim().to_string(),
                }
            } else {
                return Err(failure(&step.command, &output).into());
            };

            outcomes.push(StepOutcome {
                kind: step.kind,
                command: step.command.clone(),
                status,
            });
        }

        Ok(outcomes)
    }
}

pub(crate) fn failure(command: &CommandSpec, output: &CommandOutput) -> ApplicationError {
    let status = match output.status {
        Some(code) => format!("exit {code}"),
        None => "terminated by signal".to_string(),
    };
    ApplicationError::CommandFailed {
        command: command.to_string(),
        status,
        stderr: output.stderr.clone(),
    }
}
