//! Presentation layer for focus-panel
//!
//! This crate contains CLI definitions, the live transcript printer,
//! progress reporters and outcome formatters.

pub mod cli;
pub mod listener;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use listener::console::ConsoleTranscriptListener;
pub use output::formatter::OutcomeFormatter;
pub use progress::reporter::{ConsoleProgress, SimpleProgress};
