//! Session result

use super::message::Message;
use super::state::TerminalStatus;
use crate::participant::entities::Participant;
use serde::{Deserialize, Serialize};

/// Turn usage of one participant at session end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTally {
    pub participant: String,
    pub turns_taken: u32,
    pub max_turns: u32,
}

impl From<&Participant> for TurnTally {
    fn from(p: &Participant) -> Self {
        Self {
            participant: p.display_name().to_string(),
            turns_taken: p.turns_taken(),
            max_turns: p.max_turns(),
        }
    }
}

/// What a finished session hands back to its caller.
///
/// Always well-formed: runtime failures show up as
/// [`TerminalStatus::Error`] with `error` set, and the transcript holds
/// every message recorded before the failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub status: TerminalStatus,
    pub transcript: Vec<Message>,
    pub rounds: u32,
    pub tallies: Vec<TurnTally>,
    /// Non-fatal problems, e.g. failed transcript writes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionOutcome {
    pub fn participant_messages(&self) -> impl Iterator<Item = &Message> {
        self.transcript.iter().filter(|m| !m.is_from_moderator())
    }

    pub fn participant_turns(&self) -> usize {
        self.participant_messages().count()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
