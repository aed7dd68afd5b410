//! Progress notification port
//!
//! Defines the interface for reporting progress during a panel session.

use super::llm_gateway::GatewayError;
use panel_domain::TerminalStatus;

/// Callback for progress updates during a panel session
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain text, ...).
pub trait PanelProgressNotifier: Send + Sync {
    /// Called when a generation request for `speaker` is issued
    fn on_generation_start(&self, speaker: &str);

    /// Called when the request for `speaker` finished, after any retry
    fn on_generation_complete(&self, speaker: &str, success: bool);

    /// Called when the session reaches its terminal state
    fn on_session_end(&self, status: TerminalStatus, rounds: u32);

    /// Called after the moderator hands the floor to a participant.
    fn on_participant_selected(&self, _participant: &str, _turn: u32, _max_turns: u32) {}

    /// Called before a failed call is attempted again.
    fn on_retry(&self, _speaker: &str, _attempt: u32, _error: &GatewayError) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl PanelProgressNotifier for NoProgress {
    fn on_generation_start(&self, _speaker: &str) {}
    fn on_generation_complete(&self, _speaker: &str, _success: bool) {}
    fn on_session_end(&self, _status: TerminalStatus, _rounds: u32) {}
}
