//! Transcript messages

use crate::participant::entities::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Speaker {
    Moderator,
    Participant(ParticipantId),
}

impl Speaker {
    pub fn is_moderator(&self) -> bool {
        matches!(self, Speaker::Moderator)
    }

    pub fn participant_id(&self) -> Option<&ParticipantId> {
        match self {
            Speaker::Participant(id) => Some(id),
            Speaker::Moderator => None,
        }
    }
}

/// A single recorded utterance (Entity)
///
/// Created only by the transcript sink, which assigns `sequence_number`
/// and `timestamp`. Never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    speaker: Speaker,
    speaker_name: String,
    content: String,
    sequence_number: u64,
    timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(
        speaker: Speaker,
        speaker_name: impl Into<String>,
        content: impl Into<String>,
        sequence_number: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            speaker,
            speaker_name: speaker_name.into(),
            content: content.into(),
            sequence_number,
            timestamp,
        }
    }

    pub fn speaker(&self) -> &Speaker {
        &self.speaker
    }

    pub fn speaker_name(&self) -> &str {
        &self.speaker_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_from_moderator(&self) -> bool {
        self.speaker.is_moderator()
    }
}
