//! Port for durable transcript storage.
//!
//! Defines the [`TranscriptStore`] trait for writing each recorded message
//! to an append-only store as it is produced.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! conversation transcript in a machine-readable format (JSONL).

use panel_domain::Message;
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised by a transcript store. Never fatal to a session.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Transcript I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transcript serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transcript store unavailable: {0}")]
    Unavailable(String),
}

/// Port for persisting transcript records.
///
/// Records are appended in sequence order and never edited in place.
pub trait TranscriptStore: Send + Sync {
    /// Append one record.
    fn append(&self, message: &Message) -> Result<(), PersistenceError>;

    /// Push buffered records to durable storage.
    fn flush(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// No-op implementation for tests and when persistence is disabled.
pub struct NoTranscriptStore;

impl TranscriptStore for NoTranscriptStore {
    fn append(&self, _message: &Message) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Keeps records in memory, for tests and embedding callers.
#[derive(Default)]
pub struct InMemoryTranscriptStore {
    records: Mutex<Vec<Message>>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Message> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl TranscriptStore for InMemoryTranscriptStore {
    fn append(&self, message: &Message) -> Result<(), PersistenceError> {
        self.records
            .lock()
            .map_err(|_| PersistenceError::Unavailable("store lock poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}
