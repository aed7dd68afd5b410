//! Ordered participant registry with per-participant turn accounting.

use super::entities::{Participant, ParticipantId};
use crate::core::error::DomainError;

/// Registry of panel participants in registration order.
///
/// The pool is the only place turn counters change. Selection follows a
/// least-spoken-first policy: among participants with turns left, the one
/// with the fewest turns taken wins, and ties go to the earliest registered.
#[derive(Debug, Clone, Default)]
pub struct ParticipantPool {
    participants: Vec<Participant>,
}

impl ParticipantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant at the end of the speaking order.
    pub fn register(&mut self, participant: Participant) -> Result<(), DomainError> {
        if participant.display_name().trim().is_empty() {
            return Err(DomainError::EmptyParticipantName);
        }
        if participant.max_turns() == 0 {
            return Err(DomainError::InvalidMaxTurns(participant.id().to_string()));
        }
        if self.get(participant.id()).is_some() {
            return Err(DomainError::DuplicateParticipant(participant.id().to_string()));
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Ids of participants that still have turns left, in registration order.
    pub fn eligible(&self) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .filter(|p| p.is_eligible())
            .map(|p| p.id().clone())
            .collect()
    }

    /// Pick the next participant to speak.
    ///
    /// Equivalent to popping from a priority queue keyed by
    /// `(turns_taken, registration_index)`. Returns `None` once every
    /// participant has used its quota.
    pub fn next_speaker(&self) -> Option<ParticipantId> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_eligible())
            .min_by_key(|(index, p)| (p.turns_taken(), *index))
            .map(|(_, p)| p.id().clone())
    }

    /// Count one turn for `id`, returning its new `turns_taken`.
    pub fn increment(&mut self, id: &ParticipantId) -> Result<u32, DomainError> {
        self.participants
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| DomainError::UnknownParticipant(id.to_string()))?
            .record_turn()
    }

    /// Zero every turn counter, keeping registrations.
    pub fn reset(&mut self) {
        for participant in &mut self.participants {
            participant.reset_turns();
        }
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// True when no participant has turns left.
    pub fn is_exhausted(&self) -> bool {
        self.participants.iter().all(|p| !p.is_eligible())
    }

    /// Total turns still available across the pool.
    pub fn remaining_turns(&self) -> u32 {
        self.participants.iter().map(|p| p.remaining_turns()).sum()
    }
}
