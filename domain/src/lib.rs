//! Domain layer for focus-panel
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Panel
//!
//! A panel session is a moderated conversation: a single moderator alternates
//! with a fixed set of participants, each bounded by a turn quota.
//!
//! - **Fairness**: the participant who has spoken least goes next
//! - **Termination**: a marker token, the round limit, or exhausted quotas
//!   end the session

pub mod conversation;
pub mod core;
pub mod participant;
pub mod persona;
pub mod prompt;
pub mod termination;
pub mod util;

// Re-export commonly used types
pub use conversation::{
    config::{DEFAULT_MAX_ROUNDS, DEFAULT_TERMINATION_MARKER, ModeratorSpec, SessionConfig},
    message::{Message, Speaker},
    outcome::{SessionOutcome, TurnTally},
    state::{ConversationState, ConversationStatus, TerminalStatus, TurnState},
};
pub use core::error::DomainError;
pub use participant::{
    entities::{DEFAULT_MAX_TURNS, Participant, ParticipantId, ParticipantSpec},
    pool::ParticipantPool,
};
pub use persona::Persona;
pub use prompt::PanelPromptTemplate;
pub use termination::{MarkerDetector, NeverTerminate, TerminationDetector};
