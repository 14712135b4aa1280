//! Implementation of the `podsmith create` command.
//!
//! Responsibility: translate CLI arguments into a [`CreateRequest`], call the
//! core scaffold service, and display results. No business logic lives here.

use tracing::{info, instrument};

use podsmith_adapters::LocalFilesystem;
use podsmith_core::{
    application::{CreateReport, CreateRequest, ScaffoldService},
    domain::{ModuleName, substitution::EXAMPLE_DIR},
    error::PodsmithError,
};

use crate::{
    cli::CreateArgs,
    commands::{current_dir, template_source},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

const LABEL_WIDTH: usize = 12;

/// Execute the `podsmith create` command.
///
/// 1. Validate the module name and resolve the output directory
/// 2. Early-exit with a preview on `--dry-run`
/// 3. Acquire the template and materialize the project
/// 4. Print the summary and next steps
#[instrument(skip_all, fields(module = %args.name))]
pub fn execute(args: CreateArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let module = ModuleName::parse(&args.name).map_err(PodsmithError::from)?;
    let output_dir = match args.output {
        Some(dir) => dir,
        None => current_dir()?,
    };
    let request = CreateRequest::new(module, output_dir)
        .include_example(!args.no_example)
        .refresh_template(args.force_update);

    let service = ScaffoldService::new(
        Box::new(template_source(config)?),
        Box::new(LocalFilesystem::new()),
    );

    if args.dry_run {
        let target = service.dry_run(&request)?;
        let template = config.settings.template_settings();
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            request.module,
            target.display()
        ))?;
        output.field("Template", &template.name, LABEL_WIDTH)?;
        output.field("Repository", &template.repo, LABEL_WIDTH)?;
        output.field("Branch", &template.branch, LABEL_WIDTH)?;
        output.field("Example", yes_no(request.include_example), LABEL_WIDTH)?;
        output.field("Refresh", yes_no(request.refresh_template), LABEL_WIDTH)?;
        return Ok(());
    }

    output.header(&format!("Creating '{}'...", request.module))?;
    let identity = config.settings.identity();

    let spinner = output.spinner("Preparing template...");
    let result = service.create(&request, &identity);
    spinner.finish_and_clear();
    let report = result?;

    info!(project = %report.project_dir().display(), "Create completed");

    if output.is_json() {
        output.json(&report_json(&report)?)?;
        return Ok(());
    }
    print_summary(&report, output)?;
    print_next_steps(&report, output)?;
    Ok(())
}

fn print_summary(report: &CreateReport, output: &OutputManager) -> CliResult<()> {
    let m = &report.materialized;
    output.success(&format!(
        "Project '{}' created at {}",
        report.module,
        report.project_dir().display()
    ))?;
    output.field("Template", &report.origin.to_string(), LABEL_WIDTH)?;
    output.field("Renamed", &m.renamed.len().to_string(), LABEL_WIDTH)?;
    output.field("Substituted", &m.substituted.len().to_string(), LABEL_WIDTH)?;
    let example = if m.example_removed { "removed" } else { "kept" };
    output.field("Example", example, LABEL_WIDTH)?;
    let podspec = if m.manifest_patched {
        "patched"
    } else {
        "unchanged"
    };
    output.field("Podspec", podspec, LABEL_WIDTH)?;
    if !m.cleaned.is_empty() {
        output.field("Cleaned", &m.cleaned.len().to_string(), LABEL_WIDTH)?;
    }
    for skipped in &m.skipped {
        output.warning(&format!("Could not process {}", skipped.display()))?;
    }
    Ok(())
}

fn print_next_steps(report: &CreateReport, output: &OutputManager) -> CliResult<()> {
    if output.is_quiet() {
        return Ok(());
    }
    let project = report.project_dir();
    output.print("")?;
    output.print("Next steps:")?;
    if project.join(EXAMPLE_DIR).is_dir() {
        output.print(&format!("  cd {}", project.join(EXAMPLE_DIR).display()))?;
        output.print("  pod install")?;
        output.print(&format!("  open {}.xcworkspace", report.module))?;
    } else {
        output.print(&format!("  cd {}", project.display()))?;
        output.print(&format!("  pod lib lint {}.podspec", report.module))?;
    }
    Ok(())
}

fn report_json(report: &CreateReport) -> CliResult<serde_json::Value> {
    serde_json::to_value(report)
        .map_err(std::io::Error::other)
        .with_cli_context(|| "cannot encode the create report")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
