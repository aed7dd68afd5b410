//! Panel participants.
//!
//! - [`entities::Participant`] — a registered participant with a turn quota
//! - [`entities::ParticipantSpec`] — configuration-time description
//! - [`pool::ParticipantPool`] — ordered registry and fairness selection

pub mod entities;
pub mod pool;
