//! JSONL file writer for panel transcripts.
//!
//! Each recorded [`Message`] is serialized as a single JSON line and
//! appended to the file via a buffered writer that is flushed per line.

use chrono::SecondsFormat;
use panel_application::ports::transcript_store::{PersistenceError, TranscriptStore};
use panel_domain::Message;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// One line of the transcript file
#[derive(Debug, Serialize)]
struct TranscriptRecord<'a> {
    sequence_number: u64,
    speaker: &'static str,
    speaker_name: &'a str,
    content: &'a str,
    timestamp: String,
}

impl<'a> From<&'a Message> for TranscriptRecord<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            sequence_number: message.sequence_number(),
            speaker: if message.is_from_moderator() {
                "moderator"
            } else {
                "participant"
            },
            speaker_name: message.speaker_name(),
            content: message.content(),
            timestamp: message
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Append-only JSONL transcript store.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Existing files are appended
/// to, never truncated. Flushes on `Drop`.
pub struct JsonlTranscriptStore {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTranscriptStore {
    /// Open (or create) the transcript file at `path`.
    ///
    /// Parent directories are created as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!("Transcript file opened at {}", path.display());

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptStore for JsonlTranscriptStore {
    fn append(&self, message: &Message) -> Result<(), PersistenceError> {
        let line = serde_json::to_string(&TranscriptRecord::from(message))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| PersistenceError::Unavailable("transcript writer poisoned".to_string()))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| PersistenceError::Unavailable("transcript writer poisoned".to_string()))?;
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlTranscriptStore {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use panel_domain::{ParticipantId, Speaker};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_store_writes_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.jsonl");
        let store = JsonlTranscriptStore::open(&path).unwrap();

        store
            .append(&Message::new(
                Speaker::Moderator,
                "Moderator",
                "What do you think of the pants?",
                1,
                Utc::now(),
            ))
            .unwrap();
        store
            .append(&Message::new(
                Speaker::Participant(ParticipantId::new("Emily")),
                "Emily",
                "They look \"comfy\"\nbut pricey",
                2,
                Utc::now(),
            ))
            .unwrap();

        // Flushed per line: readable before the store is dropped
        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["sequence_number"], 1);
        assert_eq!(records[0]["speaker"], "moderator");
        assert_eq!(records[1]["speaker_name"], "Emily");
        assert_eq!(records[1]["content"], "They look \"comfy\"\nbut pricey");
        assert!(records[1]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_jsonl_store_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("panel.jsonl");

        for seq in 1..=2 {
            let store = JsonlTranscriptStore::open(&path).unwrap();
            store
                .append(&Message::new(
                    Speaker::Moderator,
                    "Moderator",
                    format!("session {seq}"),
                    1,
                    Utc::now(),
                ))
                .unwrap();
        }

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["content"], "session 2");
    }

    #[test]
    fn test_jsonl_store_open_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            JsonlTranscriptStore::open(dir.path()),
            Err(PersistenceError::Io(_))
        ));
    }
}
