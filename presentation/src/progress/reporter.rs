//! Progress reporting for simulation runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use survey_sim_application::{GatewayError, SimulationProgressNotifier};
use survey_sim_domain::{JobId, SimulationStatus};

/// Reports progress with a spinner on stderr
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix("Simulation");
        spinner.set_message("Submitting question...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }

    /// Spinner that is not drawn, used by tests and non-terminal output
    pub fn hidden() -> Self {
        Self {
            spinner: ProgressBar::hidden(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn status_label(status: SimulationStatus) -> String {
        match status {
            SimulationStatus::Queued | SimulationStatus::Running => {
                status.as_str().yellow().to_string()
            }
            SimulationStatus::Predicted => status.as_str().green().to_string(),
            SimulationStatus::Failed => status.as_str().red().to_string(),
        }
    }

    /// Current spinner message
    pub fn message(&self) -> String {
        self.spinner.message()
    }

    pub fn is_finished(&self) -> bool {
        self.spinner.is_finished()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationProgressNotifier for ProgressReporter {
    fn on_submitted(&self, job_id: &JobId, status: SimulationStatus) {
        self.spinner.set_prefix(format!("Job {}", job_id));
        self.spinner
            .set_message(format!("{} (submitted)", Self::status_label(status)));
    }

    fn on_poll(&self, attempt: u32, status: SimulationStatus) {
        self.spinner
            .set_message(format!("{} (poll {})", Self::status_label(status), attempt));
    }

    fn on_transport_retry(&self, retry: u32, max_retries: u32, error: &GatewayError) {
        self.spinner.set_message(format!(
            "{} retry {}/{}: {}",
            "!".yellow(),
            retry,
            max_retries,
            error
        ));
    }

    fn on_finished(&self, status: SimulationStatus) {
        let mark = match status {
            SimulationStatus::Predicted => "v".green(),
            _ => "x".red(),
        };
        self.spinner
            .finish_with_message(format!("{} {}", mark, Self::status_label(status)));
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl SimulationProgressNotifier for SimpleProgress {
    fn on_submitted(&self, job_id: &JobId, status: SimulationStatus) {
        eprintln!("{} job {} accepted ({})", "->".cyan(), job_id, status);
    }

    fn on_poll(&self, attempt: u32, status: SimulationStatus) {
        eprintln!("  poll {}: {}", attempt, status);
    }

    fn on_transport_retry(&self, retry: u32, max_retries: u32, error: &GatewayError) {
        eprintln!("  {} retry {}/{}: {}", "!".yellow(), retry, max_retries, error);
    }

    fn on_finished(&self, status: SimulationStatus) {
        eprintln!("{} {}", "->".cyan(), status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_latest_status() {
        colored::control::set_override(false);
        let reporter = ProgressReporter::hidden();
        reporter.on_submitted(&JobId::new("job-1").unwrap(), SimulationStatus::Queued);
        assert_eq!(reporter.message(), "Queued (submitted)");

        reporter.on_poll(2, SimulationStatus::Running);
        assert_eq!(reporter.message(), "Running (poll 2)");

        reporter.on_transport_retry(1, 3, &GatewayError::Network("reset".to_string()));
        assert!(reporter.message().contains("retry 1/3"));

        reporter.on_finished(SimulationStatus::Predicted);
        assert!(reporter.is_finished());
        assert_eq!(reporter.message(), "v Predicted");
    }
}
