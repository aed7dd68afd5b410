//! Console output formatter for panel outcomes

use colored::Colorize;
use panel_domain::{SessionOutcome, TerminalStatus};
use serde::Serialize;

/// JSON document printed with `-o json`
#[derive(Serialize)]
struct JsonReport<'a> {
    outcome: &'a SessionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
}

/// Formats session outcomes for console display
pub struct OutcomeFormatter;

impl OutcomeFormatter {
    /// Closing report printed after the live transcript
    pub fn format(outcome: &SessionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Panel Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status_label(outcome.status)
        ));
        output.push_str(&format!(
            "{} {} ({} messages)\n",
            "Rounds:".cyan().bold(),
            outcome.rounds,
            outcome.transcript.len()
        ));

        if let Some(error) = &outcome.error {
            output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
        }

        output.push_str(&Self::section_header("Turns"));
        for tally in &outcome.tallies {
            output.push_str(&format!(
                "  {:<24} {}/{}\n",
                tally.participant, tally.turns_taken, tally.max_turns
            ));
        }

        if outcome.has_warnings() {
            output.push_str(&Self::section_header("Warnings"));
            for warning in &outcome.warnings {
                output.push_str(&format!("  {} {}\n", "!".yellow(), warning));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Research summary block
    pub fn format_summary(summary: &str) -> String {
        format!(
            "{}\n{}\n",
            Self::section_header("Research Summary"),
            summary.trim()
        )
    }

    /// Format as JSON
    pub fn format_json(outcome: &SessionOutcome, summary: Option<&str>) -> String {
        serde_json::to_string_pretty(&JsonReport { outcome, summary })
            .unwrap_or_else(|_| "{}".to_string())
    }

    fn status_label(status: TerminalStatus) -> String {
        let label = status.as_str();
        match status {
            TerminalStatus::NormalEnd | TerminalStatus::FairnessExhausted => {
                label.green().to_string()
            }
            TerminalStatus::RoundLimit | TerminalStatus::Cancelled => label.yellow().to_string(),
            TerminalStatus::Error => label.red().to_string(),
        }
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
}
