//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// The configuration variants are raised before a session starts; the
/// remaining variants describe violations of the turn-accounting rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Session topic cannot be empty")]
    EmptyTopic,

    #[error("No participants configured for the panel")]
    NoParticipants,

    #[error("Participant name cannot be empty")]
    EmptyParticipantName,

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    #[error("max_turns must be positive for participant {0}")]
    InvalidMaxTurns(String),

    #[error("max_rounds must be positive")]
    InvalidMaxRounds,

    #[error("Termination marker cannot be empty")]
    EmptyTerminationMarker,

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Participant {0} has no turns left")]
    TurnQuotaExhausted(String),

    #[error("Participant {0} cannot speak twice without a moderator turn in between")]
    AlternationViolation(String),
}

impl DomainError {
    /// Check if this error is raised by session configuration validation
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyTopic
                | DomainError::NoParticipants
                | DomainError::EmptyParticipantName
                | DomainError::DuplicateParticipant(_)
                | DomainError::InvalidMaxTurns(_)
                | DomainError::InvalidMaxRounds
                | DomainError::EmptyTerminationMarker
        )
    }
}
