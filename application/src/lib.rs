//! Application layer for focus-panel
//!
//! This crate contains use cases, port definitions, the transcript relay and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod transcript;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoProgress, PanelProgressNotifier},
    transcript_listener::{ListenerError, TranscriptListener},
    transcript_store::{
        InMemoryTranscriptStore, NoTranscriptStore, PersistenceError, TranscriptStore,
    },
};
pub use transcript::{AppendReceipt, TranscriptSink};
pub use use_cases::run_panel::{RunPanelError, RunPanelInput, RunPanelUseCase};
pub use use_cases::summarize_panel::{SummarizeError, SummarizePanelUseCase};
