//! Session configuration

use crate::core::error::DomainError;
use crate::participant::entities::ParticipantSpec;
use crate::prompt::PanelPromptTemplate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Marker whose presence in a message ends the session
pub const DEFAULT_TERMINATION_MARKER: &str = "TERMINATE";

/// Upper bound on moderator/participant exchanges per session
pub const DEFAULT_MAX_ROUNDS: u32 = 20;

/// The moderator role driving the panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeratorSpec {
    pub display_name: String,
    pub prompt_template: String,
}

impl Default for ModeratorSpec {
    fn default() -> Self {
        Self {
            display_name: "Moderator".to_string(),
            prompt_template: PanelPromptTemplate::moderator_default().to_string(),
        }
    }
}

/// Everything needed to start one panel session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Opening text, recorded as the moderator's first message
    pub topic: String,
    pub moderator: ModeratorSpec,
    /// Participants in speaking-priority order
    pub participants: Vec<ParticipantSpec>,
    pub max_rounds: u32,
    pub termination_marker: String,
}

impl SessionConfig {
    pub fn new(topic: impl Into<String>, participants: Vec<ParticipantSpec>) -> Self {
        Self {
            topic: topic.into(),
            moderator: ModeratorSpec::default(),
            participants,
            max_rounds: DEFAULT_MAX_ROUNDS,
            termination_marker: DEFAULT_TERMINATION_MARKER.to_string(),
        }
    }

    pub fn with_moderator(mut self, moderator: ModeratorSpec) -> Self {
        self.moderator = moderator;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_termination_marker(mut self, marker: impl Into<String>) -> Self {
        self.termination_marker = marker.into();
        self
    }

    /// Check the configuration before any session state exists.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.topic.trim().is_empty() {
            return Err(DomainError::EmptyTopic);
        }
        if self.participants.is_empty() {
            return Err(DomainError::NoParticipants);
        }
        if self.max_rounds == 0 {
            return Err(DomainError::InvalidMaxRounds);
        }
        if self.termination_marker.is_empty() {
            return Err(DomainError::EmptyTerminationMarker);
        }

        let mut seen = HashSet::new();
        for spec in &self.participants {
            if spec.display_name.trim().is_empty() {
                return Err(DomainError::EmptyParticipantName);
            }
            if spec.max_turns == 0 {
                return Err(DomainError::InvalidMaxTurns(spec.display_name.clone()));
            }
            if !seen.insert(spec.id()) {
                return Err(DomainError::DuplicateParticipant(spec.display_name.clone()));
            }
        }

        Ok(())
    }

    pub fn participant_names(&self) -> Vec<&str> {
        self.participants
            .iter()
            .map(|p| p.display_name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(names: &[&str]) -> Vec<ParticipantSpec> {
        names
            .iter()
            .map(|n| ParticipantSpec::new(*n, "persona", "You are {name}."))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new("Recycled pants", specs(&["A"]));
        assert_eq!(config.max_rounds, 20);
        assert_eq!(config.termination_marker, "TERMINATE");
        assert_eq!(config.moderator.display_name, "Moderator");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert_eq!(
            SessionConfig::new("  ", specs(&["A"])).validate(),
            Err(DomainError::EmptyTopic)
        );
        assert_eq!(
            SessionConfig::new("t", vec![]).validate(),
            Err(DomainError::NoParticipants)
        );
        assert_eq!(
            SessionConfig::new("t", specs(&["A"]))
                .with_max_rounds(0)
                .validate(),
            Err(DomainError::InvalidMaxRounds)
        );
        assert_eq!(
            SessionConfig::new("t", specs(&["A"]))
                .with_termination_marker("")
                .validate(),
            Err(DomainError::EmptyTerminationMarker)
        );

        let mut zero = specs(&["A"]);
        zero[0].max_turns = 0;
        assert_eq!(
            SessionConfig::new("t", zero).validate(),
            Err(DomainError::InvalidMaxTurns("A".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let config = SessionConfig::new("t", specs(&["Emily Johnson", "Emily_Johnson"]));
        assert_eq!(
            config.validate(),
            Err(DomainError::DuplicateParticipant("Emily_Johnson".to_string()))
        );
    }
}
