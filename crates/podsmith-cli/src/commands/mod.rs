//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core requests, wire adapters into the
//! core services and render results. No business logic lives here.

use std::path::PathBuf;

use podsmith_adapters::{LocalFilesystem, ProcessRunner, TemplateAcquirer};

use crate::{
    config::AppConfig,
    error::{CliResult, IntoCli},
};

pub mod completions;
pub mod config;
pub mod create;
pub mod push;
pub mod repo;
pub mod tag;
pub mod template;

/// Template acquirer for the configured template, checking local copies next
/// to the working directory and the installed binary first.
pub(crate) fn template_source(config: &AppConfig) -> CliResult<TemplateAcquirer> {
    let cwd = current_dir()?;
    let exe = std::env::current_exe().ok();
    let candidates = TemplateAcquirer::default_local_candidates(&cwd, exe.as_deref());

    Ok(TemplateAcquirer::new(
        config.settings.template_settings(),
        config.paths.template_cache(),
        Box::new(LocalFilesystem::new()),
        Box::new(ProcessRunner::silent()),
    )
    .with_local_candidates(candidates))
}

pub(crate) fn current_dir() -> CliResult<PathBuf> {
    std::env::current_dir().with_cli_context(|| "cannot read the current directory")
}
