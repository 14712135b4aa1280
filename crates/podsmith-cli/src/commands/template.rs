//! `podsmith template`: inspect and refresh the template cache.

use serde_json::json;

use podsmith_core::application::TemplateService;

use crate::{
    cli::TemplateCommands,
    commands::template_source,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(cmd: TemplateCommands, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let service = TemplateService::new(Box::new(template_source(config)?));

    match cmd {
        TemplateCommands::Update => {
            let spinner = output.spinner("Updating template...");
            let result = service.update();
            spinner.finish_and_clear();
            let acquired = result?;
            output.success(&format!(
                "Template '{}' updated ({}) at {}",
                acquired.token,
                acquired.origin,
                service.location().display()
            ))?;
        }

        TemplateCommands::List => {
            let names = service.list()?;
            if output.is_json() {
                output.json(&json!(names))?;
            } else if names.is_empty() {
                output.info("No cached templates. Fetch one with: podsmith template update")?;
            } else {
                output.header(&format!("Cached templates in {}", service.location().display()))?;
                for name in names {
                    output.result(&format!("  {name}"))?;
                }
            }
        }

        TemplateCommands::Path => {
            output.result(&service.location().display().to_string())?;
        }
    }

    Ok(())
}
