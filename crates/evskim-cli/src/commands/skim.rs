use crate::cli::SkimArgs;
use crate::config::{self, AppConfig};
use crate::error::{CliError, Result};
use crate::report;
use crate::utils::discovery::discover_groups;
use crate::utils::progress::CliProgressHandler;
use evskim::engine::naming::SequentialNamer;
use evskim::engine::progress::ProgressReporter;
use evskim::engine::state::{GroupOutcome, SkimReport};
use evskim::workflows;
use std::fs;
use tracing::{info, warn};

pub fn run(args: SkimArgs, quiet: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = config::build_config(&args)?;
    let report = execute(&app_config, quiet)?;

    print_summary(&report);

    if let Some(path) = &app_config.report_path {
        report::write_report(path, &report)?;
        println!("Report written to: {}", path.display());
    }

    match report.failed_count() {
        0 => Ok(()),
        failed => Err(CliError::GroupsFailed {
            failed,
            total: report.outcomes.len(),
        }),
    }
}

pub fn execute(app_config: &AppConfig, quiet: bool) -> Result<SkimReport> {
    let groups = discover_groups(&app_config.input_dirs, &app_config.extension)?;
    if groups.is_empty() {
        warn!("No input files found; nothing to skim.");
    }

    fs::create_dir_all(&app_config.output_dir)?;
    let namer = SequentialNamer::new(&app_config.output_dir);

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core skim workflow...");
    Ok(workflows::skim::run(
        &groups,
        &app_config.core_config,
        namer,
        &reporter,
    ))
}

fn print_summary(report: &SkimReport) {
    for outcome in &report.outcomes {
        match outcome {
            GroupOutcome::Completed(summary) => println!(
                "✓ {}: {} of {} events kept",
                summary.output.display(),
                summary.events_accepted,
                summary.events_read
            ),
            GroupOutcome::Skipped { output } => {
                println!("- {}: already exists, skipped", output.display())
            }
            GroupOutcome::Failed { output, error } => {
                println!("✗ {}: {}", output.display(), error)
            }
        }
    }
    println!(
        "{} written, {} skipped, {} failed.",
        report.completed().count(),
        report.skipped_count(),
        report.failed_count()
    );
}
