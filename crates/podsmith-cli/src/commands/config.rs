//! `podsmith config`: read and write configuration values.

use std::path::Path;

use tracing::{debug, instrument};

use podsmith_adapters::{ProcessRunner, config_store::parse_document};
use podsmith_core::{
    application::ports::CommandRunner,
    domain::{CommandSpec, parse_cli_value},
};

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    prompt,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config: &mut AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let document = config.settings.document();
            if output.is_json() {
                output.json(&document.to_value())?;
            } else {
                output.header(&format!("Configuration ({})", config.config_path().display()))?;
                output.result(document.render_tree().trim_end())?;
            }
        }

        ConfigCommands::Get { key } => {
            let value = config
                .settings
                .get(&key)
                .ok_or_else(|| CliError::UnknownConfigKey { key: key.clone() })?;
            if output.is_json() {
                output.json(value)?;
            } else {
                output.result(&display_value(value))?;
            }
        }

        ConfigCommands::Set { key, value } => {
            let parsed = parse_cli_value(&value);
            config.settings.set(&key, parsed.clone())?;
            output.success(&format!("{key} = {}", display_value(&parsed)))?;
        }

        ConfigCommands::Edit => edit(config, output)?,

        ConfigCommands::Reset { yes } => {
            if !yes && !prompt::confirm("Replace the configuration with defaults?", false)? {
                return Err(CliError::Cancelled);
            }
            config.settings.reset()?;
            output.success("Configuration reset to defaults")?;
        }

        ConfigCommands::Path => {
            output.result(&config.config_path().display().to_string())?;
        }

        ConfigCommands::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_cli_context(|| format!("cannot read {}", file.display()))?;
            let document = parse_document(&file, &raw)?;
            config.settings.import(&document)?;
            output.success(&format!("Imported {}", file.display()))?;
        }

        ConfigCommands::Export { file } => {
            export(config, &file)?;
            output.success(&format!("Exported configuration to {}", file.display()))?;
        }
    }

    Ok(())
}

/// Open the config file in the operator's editor, then reload it.
#[instrument(skip_all)]
fn edit(config: &mut AppConfig, output: &OutputManager) -> CliResult<()> {
    let editor = config.settings.editor(|name| std::env::var(name).ok());
    let command = editor_command(&editor, config.config_path())?;
    debug!(command = %command, "Launching editor");

    let status = ProcessRunner::new().run_attached(&command)?;
    if status != Some(0) {
        return Err(CliError::ExternalCommandFailed {
            command: command.to_string(),
            reason: match status {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by a signal".into(),
            },
        });
    }

    config.settings.reload();
    output.success("Configuration reloaded")?;
    Ok(())
}

/// `code --wait` style editor settings carry their own arguments.
fn editor_command(editor: &str, file: &Path) -> CliResult<CommandSpec> {
    let mut words = editor.split_whitespace();
    let program = words.next().ok_or_else(|| CliError::InvalidInput {
        message: "the configured editor is empty".into(),
    })?;
    Ok(CommandSpec::new(program)
        .args(words)
        .arg(file.to_string_lossy()))
}

fn export(config: &AppConfig, file: &Path) -> CliResult<()> {
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("cannot create {}", parent.display()))?;
    }
    let mut body = config.settings.document().to_pretty_json();
    body.push('\n');
    std::fs::write(file, body).with_cli_context(|| format!("cannot write {}", file.display()))
}

/// Strings print bare, everything else as compact JSON.
fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
