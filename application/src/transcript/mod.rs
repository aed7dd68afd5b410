//! Transcript relay.
//!
//! [`TranscriptSink`] assigns sequence numbers and forwards each message to
//! the durable store and the live listeners.

mod sink;

pub use sink::{AppendReceipt, TranscriptSink};
