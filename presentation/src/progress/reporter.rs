//! Progress reporting for panel sessions

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use panel_application::ports::llm_gateway::GatewayError;
use panel_application::ports::progress::PanelProgressNotifier;
use panel_domain::TerminalStatus;
use panel_domain::util::preview;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner while a speaker is generating
pub struct ConsoleProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelProgressNotifier for ConsoleProgress {
    fn on_generation_start(&self, speaker: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(speaker.to_string());
        pb.set_message("is thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.spinner.lock()
            && let Some(previous) = guard.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_generation_complete(&self, _speaker: &str, _success: bool) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }

    fn on_session_end(&self, status: TerminalStatus, rounds: u32) {
        self.on_generation_complete("", status.is_success());
        let label = if status.is_success() {
            status.as_str().green()
        } else {
            status.as_str().red()
        };
        eprintln!("{} {} after {} rounds", "Session ended:".bold(), label, rounds);
    }

    fn on_participant_selected(&self, participant: &str, turn: u32, max_turns: u32) {
        eprintln!(
            "{}",
            format!("-> {} (turn {}/{})", participant, turn, max_turns).dimmed()
        );
    }

    fn on_retry(&self, _speaker: &str, attempt: u32, error: &GatewayError) {
        self.with_spinner(|pb| {
            pb.set_message(format!(
                "retrying after attempt {} failed: {}",
                attempt,
                preview(&error.to_string(), 60)
            ))
        });
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl PanelProgressNotifier for SimpleProgress {
    fn on_generation_start(&self, speaker: &str) {
        eprintln!("{} {} is thinking...", "->".cyan(), speaker.bold());
    }

    fn on_generation_complete(&self, speaker: &str, success: bool) {
        if !success {
            eprintln!("  {} {} (failed)", "x".red(), speaker);
        }
    }

    fn on_session_end(&self, status: TerminalStatus, rounds: u32) {
        eprintln!("Session ended: {} after {} rounds", status, rounds);
    }

    fn on_retry(&self, speaker: &str, attempt: u32, error: &GatewayError) {
        eprintln!(
            "  {} {} attempt {} failed ({}), retrying",
            "!".yellow(),
            speaker,
            attempt,
            preview(&error.to_string(), 60)
        );
    }
}
