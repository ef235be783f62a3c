//! CLI entrypoint for survey-sim
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod app;
mod logging;

use anyhow::{Result, anyhow};
use app::{App, Failure};
use clap::Parser;
use std::process::ExitCode;
use survey_sim_domain::{ErrorKind, OutputFormat};
use survey_sim_infrastructure::{ConfigLoader, FileConfig};
use survey_sim_presentation::{Cli, Command, ConsoleFormatter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {e}"))?
    };

    let log_file = cli.log_file.clone().or_else(|| config.logging.log_file_path());
    let _log_guard = logging::init_tracing(cli.verbose, log_file.as_deref());

    info!("Starting survey-sim");

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();
    if !config.output.color {
        ConsoleFormatter::disable_color();
    }

    // Config problems are reported by `survey-sim config` itself
    if !matches!(cli.command, Command::Config) {
        let issues = config.validate();
        for issue in issues.iter().filter(|i| !i.is_error()) {
            warn!("{}", issue.message);
        }
        if let Some(issue) = issues.iter().find(|i| i.is_error()) {
            let failure = Failure::new(ErrorKind::Configuration, issue.message.clone());
            return Ok(render_failure(format, &failure));
        }
    }

    // Ctrl-C stops polling; the pending result is recorded as cancelled
    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
    }

    let app = App::new(config, format, cli.quiet, cancellation);
    match app.run(cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(failure) => Ok(render_failure(app.format(), &failure)),
    }
}

fn render_failure(format: OutputFormat, failure: &Failure) -> ExitCode {
    match format {
        OutputFormat::Text => eprint!(
            "{}",
            ConsoleFormatter::format_error(failure.kind, &failure.detail, failure.result_id)
        ),
        OutputFormat::Json => println!(
            "{}",
            ConsoleFormatter::format_json(&ConsoleFormatter::error_json(
                failure.kind,
                &failure.detail,
                failure.result_id
            ))
        ),
    }
    if failure.kind == ErrorKind::Cancelled {
        ExitCode::from(130)
    } else {
        ExitCode::FAILURE
    }
}
