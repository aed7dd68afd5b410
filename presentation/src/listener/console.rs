//! Live transcript printer

use colored::Colorize;
use panel_application::ports::transcript_listener::{ListenerError, TranscriptListener};
use panel_domain::Message;
use std::io::{self, Write};
use std::sync::Mutex;

/// Prints each transcript message as it is recorded
pub struct ConsoleTranscriptListener<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleTranscriptListener<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleTranscriptListener<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Render one message block
    pub fn format_message(message: &Message) -> String {
        let name = if message.is_from_moderator() {
            message.speaker_name().cyan().bold()
        } else {
            message.speaker_name().yellow().bold()
        };
        format!(
            "{} {}\n{}\n",
            format!("#{}", message.sequence_number()).dimmed(),
            name,
            message.content().trim_end()
        )
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> TranscriptListener for ConsoleTranscriptListener<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn on_message(&self, message: &Message) -> Result<(), ListenerError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ListenerError::Other("console writer poisoned".to_string()))?;
        writeln!(out, "{}", Self::format_message(message))?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use panel_domain::{ParticipantId, Speaker};

    #[test]
    fn test_prints_speaker_and_content() {
        let listener = ConsoleTranscriptListener::new(Vec::new());

        listener
            .on_message(&Message::new(
                Speaker::Moderator,
                "Moderator",
                "Welcome everyone",
                1,
                Utc::now(),
            ))
            .unwrap();
        listener
            .on_message(&Message::new(
                Speaker::Participant(ParticipantId::new("Emily")),
                "Emily",
                "Hi!\n",
                2,
                Utc::now(),
            ))
            .unwrap();

        let printed = String::from_utf8(listener.into_inner()).unwrap();
        assert!(printed.contains("Moderator"));
        assert!(printed.contains("Welcome everyone"));
        assert!(printed.contains("Emily"));
        assert!(printed.contains("#2"));
        assert!(printed.find("Welcome").unwrap() < printed.find("Hi!").unwrap());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_reported() {
        let listener = ConsoleTranscriptListener::new(ClosedPipe);
        let result = listener.on_message(&Message::new(
            Speaker::Moderator,
            "Moderator",
            "anyone?",
            1,
            Utc::now(),
        ));
        assert!(matches!(result, Err(ListenerError::Output(_))));
    }
}
