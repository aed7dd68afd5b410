//! Participant entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default number of turns each participant may take in one session
pub const DEFAULT_MAX_TURNS: u32 = 6;

/// Stable identifier of a panel participant (Value Object)
///
/// Derived from the display name with whitespace collapsed to underscores,
/// so "Emily Johnson" becomes `Emily_Johnson`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_display_name(name: &str) -> Self {
        Self(name.split_whitespace().collect::<Vec<_>>().join("_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration-time description of a participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub display_name: String,
    pub role: String,
    pub prompt_template: String,
    pub max_turns: u32,
}

impl ParticipantSpec {
    pub fn new(
        display_name: impl Into<String>,
        role: impl Into<String>,
        prompt_template: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            role: role.into(),
            prompt_template: prompt_template.into(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn id(&self) -> ParticipantId {
        ParticipantId::from_display_name(&self.display_name)
    }
}

/// A registered panel participant (Entity)
///
/// Everything except `turns_taken` is fixed at registration time.
/// `turns_taken` only moves forward through [`Participant::record_turn`],
/// which keeps `turns_taken <= max_turns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    display_name: String,
    role: String,
    prompt_template: String,
    max_turns: u32,
    turns_taken: u32,
}

impl Participant {
    pub fn new(
        id: ParticipantId,
        display_name: impl Into<String>,
        role: impl Into<String>,
        prompt_template: impl Into<String>,
        max_turns: u32,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role: role.into(),
            prompt_template: prompt_template.into(),
            max_turns,
            turns_taken: 0,
        }
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn turns_taken(&self) -> u32 {
        self.turns_taken
    }

    pub fn remaining_turns(&self) -> u32 {
        self.max_turns - self.turns_taken
    }

    /// Whether this participant may still be selected to speak
    pub fn is_eligible(&self) -> bool {
        self.turns_taken < self.max_turns
    }

    pub(crate) fn record_turn(&mut self) -> Result<u32, DomainError> {
        if !self.is_eligible() {
            return Err(DomainError::TurnQuotaExhausted(self.id.to_string()));
        }
        self.turns_taken += 1;
        Ok(self.turns_taken)
    }

    pub(crate) fn reset_turns(&mut self) {
        self.turns_taken = 0;
    }
}

impl From<&ParticipantSpec> for Participant {
    fn from(spec: &ParticipantSpec) -> Self {
        Participant::new(
            spec.id(),
            spec.display_name.clone(),
            spec.role.clone(),
            spec.prompt_template.clone(),
            spec.max_turns,
        )
    }
}
