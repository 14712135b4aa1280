//! `podsmith tag`: create and re-create git tags.

use tracing::instrument;

use podsmith_adapters::ProcessRunner;
use podsmith_core::{
    application::{StepOutcome, StepStatus, TagFlags, TagService},
    domain::{TagName, TagRequest},
    error::PodsmithError,
};

use crate::{
    cli::{TagArgs, TagCommands},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(cmd: TagCommands, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let service = TagService::new(Box::new(ProcessRunner::new()));

    match cmd {
        TagCommands::Create { tag, no_push } => {
            let request = request(&tag, config)?;
            let flags = TagFlags {
                dry_run: tag.dry_run,
                force: false,
            };
            let outcomes = service.create(&request, !no_push, flags)?;
            report(&outcomes, flags, output)?;
            if !flags.dry_run {
                let name = &request.tag;
                let done = if no_push {
                    format!("Tag '{name}' created")
                } else {
                    format!("Tag '{name}' created and pushed to {}", request.remote)
                };
                output.success(&done)?;
            }
        }

        TagCommands::Retag { tag, force } => {
            let request = request(&tag, config)?;
            let flags = TagFlags {
                dry_run: tag.dry_run,
                force,
            };
            let outcomes = service.retag(&request, flags)?;
            report(&outcomes, flags, output)?;
            if !flags.dry_run {
                output.success(&format!(
                    "Tag '{}' re-created and pushed to {}",
                    request.tag, request.remote
                ))?;
            }
        }
    }

    Ok(())
}

fn request(args: &TagArgs, config: &AppConfig) -> CliResult<TagRequest> {
    let tag = TagName::parse(&args.name).map_err(PodsmithError::from)?;
    let remote = args
        .remote
        .clone()
        .unwrap_or_else(|| config.settings.git_remote());
    Ok(TagRequest::new(tag, remote)
        .with_commit(args.commit.clone())
        .with_message(args.message.clone()))
}

fn report(outcomes: &[StepOutcome], flags: TagFlags, output: &OutputManager) -> CliResult<()> {
    if flags.dry_run {
        output.header("Dry run: these commands would run")?;
    }
    for outcome in outcomes {
        match &outcome.status {
            StepStatus::Planned => output.result(&format!("  {}", outcome.command))?,
            StepStatus::Succeeded => output.info(outcome.kind.describe())?,
            StepStatus::TagMissing { .. } => output.warning(&format!(
                "{}: tag not found, continuing",
                outcome.kind.describe()
            ))?,
        }
    }
    Ok(())
}
