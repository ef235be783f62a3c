//! Console output formatter for simulation results

use colored::Colorize;
use serde_json::{Value, json};
use std::time::Duration;
use survey_sim_application::{QuestionSummary, RemotePopulation, SimulationReport};
use survey_sim_domain::{
    ErrorKind, Population, Question, ResultId, ResultPayload, SimulationResult, SimulationStatus,
};

/// Width of a full (100%) percentage bar
const BAR_WIDTH: usize = 30;

/// Formats simulation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Turn off ANSI colors for everything printed afterwards
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    /// Format a finished `ask` run
    pub fn format_report(report: &SimulationReport) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Simulation Result"));
        output.push('\n');
        output.push_str(&Self::field("Population:", &report.population.label()));
        output.push_str(&Self::body(&report.question, &report.result));
        output.push_str(&format!(
            "\n{}\n",
            format!(
                "{} polls in {}",
                report.polls,
                Self::duration(report.elapsed)
            )
            .dimmed()
        ));
        output.push_str(&Self::footer());
        output
    }

    /// Format a stored result (`result show` / `result refresh`)
    pub fn format_result(question: &Question, result: &SimulationResult) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Stored Result"));
        output.push('\n');
        output.push_str(&Self::field("Population:", question.population_id.as_str()));
        output.push_str(&Self::body(question, result));
        output.push_str(&Self::field(
            "Updated:",
            &result.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ));
        output.push_str(&Self::footer());
        output
    }

    fn body(question: &Question, result: &SimulationResult) -> String {
        let mut output = String::new();
        output.push_str(&Self::field("Question:", &question.text));
        output.push_str(&Self::field("Kind:", question.kind.display_name()));
        output.push_str(&Self::field("Status:", &Self::status(result.status())));
        if let Some(job_id) = &result.job_id {
            output.push_str(&Self::field("Job:", job_id.as_str()));
        }
        output.push_str(&Self::field("Result:", &result.id.to_string()));

        if let Some(payload) = &result.payload {
            output.push_str(&Self::section_header("Answers"));
            output.push_str(&Self::format_payload(payload));
        }

        if !result.warnings.is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
            for warning in &result.warnings {
                output.push_str(&format!("  ! {}\n", warning));
            }
        }

        if let Some(failure) = &result.failure {
            output.push_str(&format!(
                "\n{} {}\n  {}\n",
                "Failed:".red().bold(),
                failure.kind.user_message(),
                failure.message
            ));
        } else if !result.is_terminal() {
            output.push_str(&format!(
                "\n{}\n",
                "Still pending: run `survey-sim result refresh <id>` to check again.".dimmed()
            ));
        }
        output
    }

    /// Render a normalized payload: one bar per option, or the answer text
    pub fn format_payload(payload: &ResultPayload) -> String {
        match payload {
            ResultPayload::Percentages(map) => {
                let leading = payload.leading_option().map(|(option, _)| option);
                let label_width = map.keys().map(|k| k.chars().count()).max().unwrap_or(0);
                let mut output = String::new();
                for (option, &value) in map {
                    let line = format!(
                        "  {:<width$}  {}  {:>5.1}%",
                        option,
                        Self::bar(value),
                        value * 100.0,
                        width = label_width
                    );
                    if leading == Some(option.as_str()) {
                        output.push_str(&format!("{}\n", line.green().bold()));
                    } else {
                        output.push_str(&format!("{}\n", line));
                    }
                }
                output
            }
            ResultPayload::Text(texts) => texts
                .iter()
                .map(|text| format!("{}\n", Self::indent(text, "  ")))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// A fixed-width bar; values outside `[0, 1]` are clamped
    pub fn bar(value: f64) -> String {
        let filled = (value.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
    }

    pub fn format_populations(populations: &[Population]) -> String {
        if populations.is_empty() {
            return format!(
                "{}\n",
                "No populations registered. Add one with `survey-sim population add <ID> <NAME>`."
                    .dimmed()
            );
        }
        let id_width = populations
            .iter()
            .map(|p| p.id.as_str().chars().count())
            .max()
            .unwrap_or(0);
        let mut output = Self::section_header("Populations");
        for population in populations {
            output.push_str(&format!(
                "  {:<width$}  {}",
                population.id.as_str().cyan(),
                population.name,
                width = id_width
            ));
            if let Some(description) = &population.description {
                output.push_str(&format!("  {}", description.dimmed()));
            }
            output.push('\n');
        }
        output
    }

    pub fn format_population(population: &Population, remote: Option<&RemotePopulation>) -> String {
        let mut output = String::new();
        output.push_str(&Self::field("Population:", &population.label()));
        if let Some(description) = &population.description {
            output.push_str(&Self::field("Description:", description));
        }
        output.push_str(&Self::field(
            "Registered:",
            &population.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ));
        if let Some(remote) = remote {
            output.push_str(&Self::section_header("Remote metadata"));
            output.push_str(&Self::indent(&Self::format_json(&remote.raw), "  "));
            output.push('\n');
        }
        output
    }

    pub fn format_history(summaries: &[QuestionSummary]) -> String {
        if summaries.is_empty() {
            return format!("{}\n", "No questions asked yet.".dimmed());
        }
        let mut output = Self::section_header("Recent questions");
        for summary in summaries {
            let question = &summary.question;
            output.push_str(&format!(
                "\n{} {}\n",
                question.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                question.text.bold()
            ));
            output.push_str(&format!(
                "  {} {}  {} {}\n",
                "population".dimmed(),
                question.population_id,
                "question".dimmed(),
                question.id
            ));
            match &summary.latest {
                Some(result) => {
                    let mut line = format!(
                        "  {} {}  {}",
                        "result".dimmed(),
                        result.id,
                        Self::status(result.status())
                    );
                    if let Some(payload) = &result.payload {
                        if let Some((option, value)) = payload.leading_option() {
                            line.push_str(&format!("  leading: {} ({:.1}%)", option, value * 100.0));
                        }
                    }
                    output.push_str(&line);
                    output.push('\n');
                }
                None => output.push_str(&format!("  {}\n", "no result".dimmed())),
            }
        }
        output
    }

    /// Render a failure as the user-facing message for its kind plus detail
    pub fn format_error(kind: ErrorKind, detail: &str, result_id: Option<ResultId>) -> String {
        let mut output = format!("{} {}\n", "Error:".red().bold(), kind.user_message());
        if !detail.is_empty() {
            output.push_str(&format!("  {}\n", detail));
        }
        if let Some(id) = result_id {
            output.push_str(&format!(
                "  {}\n",
                format!("The failure was recorded on result {id}.").dimmed()
            ));
        }
        output
    }

    // ==================== JSON ====================

    pub fn report_json(report: &SimulationReport) -> Value {
        let mut value = Self::result_json(&report.question, &report.result);
        if let Value::Object(map) = &mut value {
            map.insert("population".to_string(), json!({
                "id": report.population.id,
                "name": report.population.name,
            }));
            map.insert("polls".to_string(), json!(report.polls));
            map.insert(
                "elapsed_secs".to_string(),
                json!(report.elapsed.as_secs_f64()),
            );
        }
        value
    }

    pub fn result_json(question: &Question, result: &SimulationResult) -> Value {
        json!({
            "result_id": result.id,
            "question": {
                "id": question.id,
                "population_id": question.population_id,
                "text": question.text,
                "kind": question.kind,
                "options": question.options,
            },
            "status": result.status().as_str(),
            "job_id": result.job_id,
            "payload": result.payload,
            "warnings": result.warnings,
            "failure": result.failure,
            "updated_at": result.updated_at.to_rfc3339(),
        })
    }

    pub fn history_json(summaries: &[QuestionSummary]) -> Value {
        Value::Array(
            summaries
                .iter()
                .map(|summary| {
                    json!({
                        "question": summary.question,
                        "latest": summary.latest.as_ref().map(|r| json!({
                            "result_id": r.id,
                            "status": r.status().as_str(),
                            "payload": r.payload,
                        })),
                    })
                })
                .collect(),
        )
    }

    pub fn error_json(kind: ErrorKind, detail: &str, result_id: Option<ResultId>) -> Value {
        json!({
            "error": {
                "kind": kind.as_str(),
                "message": kind.user_message(),
                "detail": detail,
                "result_id": result_id,
            }
        })
    }

    pub fn format_json(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    // ==================== Helpers ====================

    fn status(status: SimulationStatus) -> String {
        match status {
            SimulationStatus::Predicted => status.as_str().green().bold().to_string(),
            SimulationStatus::Failed => status.as_str().red().bold().to_string(),
            SimulationStatus::Queued | SimulationStatus::Running => {
                status.as_str().yellow().to_string()
            }
        }
    }

    fn duration(elapsed: Duration) -> String {
        format!("{:.1}s", elapsed.as_secs_f64())
    }

    fn field(label: &str, value: &str) -> String {
        format!("{} {}\n", label.cyan().bold(), value)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
