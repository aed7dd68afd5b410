//! Conversation domain.
//!
//! - [`config::SessionConfig`] — topic, moderator, participants and limits
//! - [`message::Message`] — one recorded utterance
//! - [`state::ConversationState`] — turn state machine data for one session
//! - [`outcome::SessionOutcome`] — terminal status plus transcript

pub mod config;
pub mod message;
pub mod outcome;
pub mod state;
