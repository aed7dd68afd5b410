//! Conversation state owned by a single running session.

use super::config::{ModeratorSpec, SessionConfig};
use super::message::{Message, Speaker};
use crate::core::error::DomainError;
use crate::participant::entities::{Participant, ParticipantId};
use crate::participant::pool::ParticipantPool;
use serde::{Deserialize, Serialize};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalStatus {
    /// A message contained the termination marker
    NormalEnd,
    /// The configured number of rounds was used up
    RoundLimit,
    /// Every participant used its turn quota
    FairnessExhausted,
    /// The session was aborted from outside
    Cancelled,
    /// A gateway or selection failure ended the session
    Error,
}

impl TerminalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalStatus::NormalEnd => "NORMAL_END",
            TerminalStatus::RoundLimit => "ROUND_LIMIT",
            TerminalStatus::FairnessExhausted => "FAIRNESS_EXHAUSTED",
            TerminalStatus::Cancelled => "CANCELLED",
            TerminalStatus::Error => "ERROR",
        }
    }

    /// Whether the session reached one of its planned stopping points
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TerminalStatus::NormalEnd
                | TerminalStatus::RoundLimit
                | TerminalStatus::FairnessExhausted
        )
    }
}

impl std::fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse session status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationStatus {
    Active,
    Terminated(TerminalStatus),
}

/// Position of the turn-taking state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    /// The moderator speaks next, then picks a participant
    AwaitingModerator,
    /// The given participant has been selected and must reply
    AwaitingParticipant(ParticipantId),
    Terminated(TerminalStatus),
}

/// Mutable state of one panel session.
///
/// Built from a validated [`SessionConfig`] at session start and dropped
/// when the session ends. Only the orchestrator holds a `&mut` to it.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pool: ParticipantPool,
    moderator: ModeratorSpec,
    history: Vec<Message>,
    round: u32,
    turn: TurnState,
}

impl ConversationState {
    pub fn from_config(config: &SessionConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let mut pool = ParticipantPool::new();
        for spec in &config.participants {
            pool.register(Participant::from(spec))?;
        }

        Ok(Self {
            pool,
            moderator: config.moderator.clone(),
            history: Vec::new(),
            round: 0,
            turn: TurnState::AwaitingModerator,
        })
    }

    pub fn pool(&self) -> &ParticipantPool {
        &self.pool
    }

    pub fn moderator(&self) -> &ModeratorSpec {
        &self.moderator
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn into_history(self) -> Vec<Message> {
        self.history
    }

    /// Completed moderator/participant exchanges
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn status(&self) -> ConversationStatus {
        match self.turn {
            TurnState::Terminated(status) => ConversationStatus::Terminated(status),
            _ => ConversationStatus::Active,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.turn, TurnState::Terminated(_))
    }

    /// Check whether `speaker` may add the next message.
    ///
    /// Rejects a participant that would directly follow another participant
    /// message, and any participant other than the currently selected one.
    pub fn can_record(&self, speaker: &Speaker) -> Result<(), DomainError> {
        if let Speaker::Participant(id) = speaker {
            let follows_participant = self
                .history
                .last()
                .is_some_and(|last| !last.is_from_moderator());
            let selected = matches!(&self.turn, TurnState::AwaitingParticipant(current) if current == id);
            if follows_participant || !selected {
                return Err(DomainError::AlternationViolation(id.to_string()));
            }
        }
        Ok(())
    }

    /// Append a recorded message to the history, subject to [`Self::can_record`].
    pub fn record(&mut self, message: Message) -> Result<(), DomainError> {
        self.can_record(message.speaker())?;
        self.history.push(message);
        Ok(())
    }

    /// Hand the floor to `id` after the moderator's turn.
    pub fn select_participant(&mut self, id: ParticipantId) -> Result<(), DomainError> {
        match self.pool.get(&id) {
            Some(p) if p.is_eligible() => {
                self.turn = TurnState::AwaitingParticipant(id);
                Ok(())
            }
            Some(_) => Err(DomainError::TurnQuotaExhausted(id.to_string())),
            None => Err(DomainError::UnknownParticipant(id.to_string())),
        }
    }

    /// Close the current participant turn: count it and advance the round.
    pub fn complete_participant_turn(&mut self) -> Result<u32, DomainError> {
        let TurnState::AwaitingParticipant(id) = &self.turn else {
            return Err(DomainError::AlternationViolation(
                "no participant selected".to_string(),
            ));
        };
        let id = id.clone();
        self.pool.increment(&id)?;
        self.round += 1;
        self.turn = TurnState::AwaitingModerator;
        Ok(self.round)
    }

    /// Move to the terminal state. The first terminal status wins.
    pub fn terminate(&mut self, status: TerminalStatus) {
        if !self.is_terminated() {
            self.turn = TurnState::Terminated(status);
        }
    }

    pub fn participant_message_count(&self) -> usize {
        self.history
            .iter()
            .filter(|m| !m.is_from_moderator())
            .count()
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.pool.iter()
    }
}
