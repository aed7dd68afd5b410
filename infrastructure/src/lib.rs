//! Infrastructure layer for focus-panel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gateway;
pub mod persona;
pub mod transcript;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use gateway::{OpenAiGatewayConfig, OpenAiLlmGateway};
pub use persona::{JsonPersonaLoader, PersonaLoadError};
pub use transcript::JsonlTranscriptStore;
