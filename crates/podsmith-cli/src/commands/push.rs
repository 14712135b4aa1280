//! Implementation of the `podsmith push` command.
//!
//! Find the podspec, validate and lint it, resolve the spec repository,
//! confirm, then run `pod repo push` with its output streamed live.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use podsmith_adapters::{LocalFilesystem, ProcessRunner};
use podsmith_core::{
    application::{PushPlan, PushService},
    domain::PushOptions,
};

use crate::{
    cli::{PushArgs, RepoActionArgs},
    commands::{current_dir, repo},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt,
};

const LABEL_WIDTH: usize = 10;
/// Lint stderr lines shown when the lint fails.
const LINT_TAIL: usize = 15;

#[instrument(skip_all)]
pub fn execute(args: PushArgs, config: &mut AppConfig, output: &OutputManager) -> CliResult<()> {
    if run_repo_action(&args.repo_action, config, output)? {
        return Ok(());
    }

    let service = PushService::new(
        Box::new(ProcessRunner::new()),
        Box::new(LocalFilesystem::new()),
    );

    let podspec = match &args.podspec {
        Some(path) => path.clone(),
        None => detect_podspec(&service, output)?,
    };

    let recognised = service.validate(&podspec)?;
    if !recognised
        && !args.yes
        && !prompt::confirm(
            &format!(
                "{} does not look like a podspec. Continue?",
                podspec.display()
            ),
            false,
        )?
    {
        return Err(CliError::Cancelled);
    }

    if !args.no_lint {
        lint(&service, &podspec, args.yes, output)?;
    }

    let (repo_name, repo_url) = config.settings.resolve_spec_repo(args.repo.as_deref())?;
    let plan = PushPlan::new(repo_name, repo_url, podspec, &push_options(&args));

    output.header("Push summary")?;
    output.field("Podspec", &plan.podspec.display().to_string(), LABEL_WIDTH)?;
    output.field(
        "Repo",
        &format!("{} ({})", plan.repo_name, plan.repo_url),
        LABEL_WIDTH,
    )?;
    output.field("Command", &plan.command.to_string(), LABEL_WIDTH)?;

    if !args.yes && !prompt::confirm("Push now?", true)? {
        return Err(CliError::Cancelled);
    }

    service.push(&plan)?;
    info!(repo = %plan.repo_name, "Push completed");
    output.success(&format!(
        "Pushed {} to '{}'",
        file_name(&plan.podspec),
        plan.repo_name
    ))?;
    Ok(())
}

/// Handle `--list-repos` and friends. Returns `true` if one ran.
fn run_repo_action(
    action: &RepoActionArgs,
    config: &mut AppConfig,
    output: &OutputManager,
) -> CliResult<bool> {
    if action.list_repos {
        repo::list(config, output)?;
    } else if let Some([name, url]) = action.add_repo.as_deref() {
        repo::add(config, output, name, url)?;
    } else if let Some(name) = &action.remove_repo {
        repo::remove(config, output, name)?;
    } else if let Some(name) = &action.set_default_repo {
        repo::set_default(config, output, name)?;
    } else {
        return Ok(false);
    }
    Ok(true)
}

fn detect_podspec(service: &PushService, output: &OutputManager) -> CliResult<PathBuf> {
    let mut found = service.find_podspecs(&current_dir()?)?;
    if found.len() == 1 {
        let podspec = found.remove(0);
        output.info(&format!("Using {}", file_name(&podspec)))?;
        return Ok(podspec);
    }
    let names: Vec<String> = found.iter().map(|p| file_name(p)).collect();
    let choice = prompt::select("Several podspecs found. Which one?", &names)?;
    Ok(found.swap_remove(choice))
}

/// A failing lint asks before carrying on, unless `--yes` was given.
fn lint(service: &PushService, podspec: &Path, yes: bool, output: &OutputManager) -> CliResult<()> {
    let spinner = output.spinner("Linting podspec...");
    let result = service.lint(podspec);
    spinner.finish_and_clear();
    let lint = result?;

    if lint.success() {
        output.success("Lint passed")?;
        return Ok(());
    }

    output.warning("pod spec lint failed")?;
    let combined = lint.combined();
    let lines: Vec<&str> = combined.lines().collect();
    for line in &lines[lines.len().saturating_sub(LINT_TAIL)..] {
        output.print(&format!("  {line}"))?;
    }
    if !yes && !prompt::confirm("Push anyway?", false)? {
        return Err(CliError::Cancelled);
    }
    Ok(())
}

fn push_options(args: &PushArgs) -> PushOptions {
    PushOptions {
        allow_warnings: !args.no_allow_warnings,
        verbose: !args.no_verbose,
        skip_import_validation: !args.no_skip_import_validation,
        use_libraries: !args.no_use_libraries,
        use_modular_headers: !args.no_use_modular_headers,
        swift_version: args.swift_version.clone(),
        sources: args.sources.clone(),
        no_overwrite: args.no_overwrite,
        local_only: args.local_only,
        commit_message: args.commit_message.clone(),
        extra_args: args
            .extra_args
            .as_deref()
            .map(PushOptions::parse_extra_args)
            .unwrap_or_default(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
