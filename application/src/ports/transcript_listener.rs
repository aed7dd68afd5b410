//! Port for live transcript subscribers.
//!
//! Listeners receive every recorded message in order (e.g. to render it in
//! a terminal). They are best-effort: a failing listener is logged and
//! skipped, and never stops the conversation.

use panel_domain::Message;
use thiserror::Error;

/// Error reported by a transcript listener
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("Listener output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("Listener error: {0}")]
    Other(String),
}

/// Observer of the transcript append stream
pub trait TranscriptListener: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &str {
        "listener"
    }

    /// Called once per recorded message, in sequence order.
    fn on_message(&self, message: &Message) -> Result<(), ListenerError>;
}
