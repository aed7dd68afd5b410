//! Append-only transcript relay.

use crate::ports::transcript_listener::TranscriptListener;
use crate::ports::transcript_store::{PersistenceError, TranscriptStore};
use chrono::Utc;
use panel_domain::{Message, Speaker};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one [`TranscriptSink::append`] call.
///
/// The message is always recorded; `persistence_error` reports a failed
/// durable write so the caller can surface it as a warning.
#[derive(Debug)]
pub struct AppendReceipt {
    pub message: Message,
    pub persistence_error: Option<PersistenceError>,
}

impl AppendReceipt {
    pub fn sequence_number(&self) -> u64 {
        self.message.sequence_number()
    }
}

/// Stamps messages with sequence numbers and relays them.
///
/// Every appended message goes to the durable [`TranscriptStore`] first and
/// then to each registered [`TranscriptListener`]. Sequence numbers start
/// at 1 and increase by one per call.
pub struct TranscriptSink {
    store: Arc<dyn TranscriptStore>,
    listeners: Vec<Arc<dyn TranscriptListener>>,
    last_sequence: u64,
}

impl TranscriptSink {
    pub fn new(store: Arc<dyn TranscriptStore>) -> Self {
        Self {
            store,
            listeners: Vec::new(),
            last_sequence: 0,
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn TranscriptListener>) -> Self {
        self.subscribe(listener);
        self
    }

    pub fn subscribe(&mut self, listener: Arc<dyn TranscriptListener>) {
        self.listeners.push(listener);
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Record one message and relay it.
    pub fn append(
        &mut self,
        speaker: Speaker,
        speaker_name: &str,
        content: impl Into<String>,
    ) -> AppendReceipt {
        self.last_sequence += 1;
        let message = Message::new(
            speaker,
            speaker_name,
            content,
            self.last_sequence,
            Utc::now(),
        );
        debug!(
            "Transcript #{} from {} ({} bytes)",
            message.sequence_number(),
            message.speaker_name(),
            message.content().len()
        );

        let persistence_error = match self.store.append(&message) {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    "Failed to persist transcript record #{}: {}",
                    message.sequence_number(),
                    e
                );
                Some(e)
            }
        };

        for listener in &self.listeners {
            if let Err(e) = listener.on_message(&message) {
                warn!(
                    "Transcript listener '{}' failed on record #{}: {}",
                    listener.name(),
                    message.sequence_number(),
                    e
                );
            }
        }

        AppendReceipt {
            message,
            persistence_error,
        }
    }

    /// Flush the durable store.
    pub fn flush(&self) -> Result<(), PersistenceError> {
        self.store.flush()
    }
}
