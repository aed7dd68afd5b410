//! LLM Gateway port
//!
//! Defines the interface for producing replies from a language model.

use async_trait::async_trait;
use panel_domain::Message;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// This port defines how the application layer asks a language model to
/// speak for a panel role. Implementations (adapters) live in the
/// infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Produce the next utterance for the role described by `system_prompt`,
    /// given the conversation so far.
    async fn generate(&self, system_prompt: &str, history: &[Message])
    -> Result<String, GatewayError>;
}
