//! `podsmith repo`: the spec-repository registry.
//!
//! The same actions back `push --list-repos`, `--add-repo`, `--remove-repo`
//! and `--set-default-repo`.

use serde_json::json;

use crate::{
    cli::RepoCommands,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(cmd: RepoCommands, config: &mut AppConfig, output: &OutputManager) -> CliResult<()> {
    match cmd {
        RepoCommands::List => list(config, output),
        RepoCommands::Add { name, url } => add(config, output, &name, &url),
        RepoCommands::Remove { name } => remove(config, output, &name),
        RepoCommands::Default { name } => set_default(config, output, &name),
    }
}

pub fn list(config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let repos = config.settings.spec_repos();
    let default = config.settings.default_spec_repo();

    if output.is_json() {
        output.json(&json!({ "default": default, "repos": repos }))?;
        return Ok(());
    }
    if repos.is_empty() {
        output.info(
            "No spec repositories registered. Add one with: podsmith repo add <NAME> <URL>",
        )?;
        return Ok(());
    }

    output.header("Spec repositories")?;
    let width = repos.keys().map(String::len).max().unwrap_or(0);
    for (name, url) in &repos {
        let is_default = Some(name.as_str()) == default;
        let marker = if is_default { "*" } else { " " };
        output.result(&format!("{marker} {name:<width$}  {url}"))?;
    }
    Ok(())
}

pub fn add(config: &mut AppConfig, output: &OutputManager, name: &str, url: &str) -> CliResult<()> {
    let became_default = config.settings.add_spec_repo(name, url)?;
    output.success(&format!("Added spec repository '{name}' ({url})"))?;
    if became_default {
        output.info(&format!("'{name}' is now the default repository"))?;
    }
    Ok(())
}

pub fn remove(config: &mut AppConfig, output: &OutputManager, name: &str) -> CliResult<()> {
    let was_default = config.settings.remove_spec_repo(name)?;
    output.success(&format!("Removed spec repository '{name}'"))?;
    if was_default {
        output.warning(
            "No default repository is set now. Pick one with: podsmith repo default <NAME>",
        )?;
    }
    Ok(())
}

pub fn set_default(config: &mut AppConfig, output: &OutputManager, name: &str) -> CliResult<()> {
    config.settings.set_default_spec_repo(name)?;
    output.success(&format!("'{name}' is now the default repository"))?;
    Ok(())
}
