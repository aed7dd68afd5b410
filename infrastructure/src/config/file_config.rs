//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain types once the
//! CLI overrides have been applied.

use panel_application::ExecutionParams;
use panel_domain::{
    DEFAULT_MAX_ROUNDS, DEFAULT_MAX_TURNS, DEFAULT_TERMINATION_MARKER, ModeratorSpec,
    PanelPromptTemplate, ParticipantSpec, SessionConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("session.topic is not set")]
    MissingTopic,

    #[error("gateway.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("gateway.model cannot be empty")]
    EmptyModelName,

    #[error("gateway.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("participants[{0}].name cannot be empty")]
    EmptyParticipantName(usize),

    #[error("gateway.temperature must be between 0 and 2, got {0}")]
    InvalidTemperature(f32),
}

/// `[session]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Opening prompt; usually supplied with `--topic`
    pub topic: Option<String>,
    pub max_rounds: u32,
    pub termination_marker: String,
    /// Quota for participants that do not set `max_turns`
    pub default_max_turns: u32,
    /// Persona JSON file to load participants from
    pub personas: Option<PathBuf>,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            topic: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
            termination_marker: DEFAULT_TERMINATION_MARKER.to_string(),
            default_max_turns: DEFAULT_MAX_TURNS,
            personas: None,
        }
    }
}

/// `[moderator]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModeratorConfig {
    pub name: String,
    /// System prompt template; the built-in one is used when unset
    pub prompt: Option<String>,
}

impl Default for FileModeratorConfig {
    fn default() -> Self {
        Self {
            name: "Moderator".to_string(),
            prompt: None,
        }
    }
}

/// One `[[participants]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileParticipantConfig {
    pub name: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub max_turns: Option<u32>,
}

fn default_role() -> String {
    "panel participant".to_string()
}

/// `[gateway]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// OpenAI-compatible API root, without `/chat/completions`
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Per-call timeout
    pub timeout_seconds: u64,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: None,
            max_tokens: None,
            timeout_seconds: 120,
        }
    }
}

impl FileGatewayConfig {
    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default().with_call_timeout(Duration::from_secs(self.timeout_seconds))
    }
}

/// `[transcript]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTranscriptConfig {
    pub path: PathBuf,
    pub enabled: bool,
}

impl Default for FileTranscriptConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("panel_transcript.jsonl"),
            enabled: true,
        }
    }
}

/// `[summary]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSummaryConfig {
    pub enabled: bool,
}

impl Default for FileSummaryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub session: FileSessionConfig,
    pub moderator: FileModeratorConfig,
    pub participants: Vec<FileParticipantConfig>,
    pub gateway: FileGatewayConfig,
    pub transcript: FileTranscriptConfig,
    pub summary: FileSummaryConfig,
}

impl FileConfig {
    /// Validate the file-level settings.
    ///
    /// Session rules (participant count, quotas, marker) are checked by
    /// [`SessionConfig::validate`] once personas are merged in.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.gateway.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.gateway.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if let Some(t) = self.gateway.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigValidationError::InvalidTemperature(t));
        }
        if let Some(index) = self
            .participants
            .iter()
            .position(|p| p.name.trim().is_empty())
        {
            return Err(ConfigValidationError::EmptyParticipantName(index));
        }
        Ok(())
    }

    /// Participants declared inline in the config file
    pub fn participant_specs(&self) -> Vec<ParticipantSpec> {
        self.participants
            .iter()
            .map(|p| {
                let prompt = p
                    .prompt
                    .clone()
                    .unwrap_or_else(|| PanelPromptTemplate::participant_default().to_string());
                ParticipantSpec::new(p.name.trim(), p.role.clone(), prompt)
                    .with_max_turns(p.max_turns.unwrap_or(self.session.default_max_turns))
            })
            .collect()
    }

    /// Build the session configuration.
    ///
    /// `extra` participants (e.g. loaded personas) are registered after the
    /// inline ones.
    pub fn to_session_config(
        &self,
        extra: Vec<ParticipantSpec>,
    ) -> Result<SessionConfig, ConfigValidationError> {
        self.validate()?;
        let topic = self
            .session
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigValidationError::MissingTopic)?;

        let mut participants = self.participant_specs();
        participants.extend(extra);

        let moderator = ModeratorSpec {
            display_name: self.moderator.name.clone(),
            prompt_template: self
                .moderator
                .prompt
                .clone()
                .unwrap_or_else(|| PanelPromptTemplate::moderator_default().to_string()),
        };

        Ok(SessionConfig::new(topic, participants)
            .with_moderator(moderator)
            .with_max_rounds(self.session.max_rounds)
            .with_termination_marker(self.session.termination_marker.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[session]
topic = "Recycled denim pants"
max_rounds = 12
termination_marker = "<END>"
default_max_turns = 3

[moderator]
name = "Alex"
prompt = "You are {name}. Talk with {participants} about {topic}."

[[participants]]
name = "Emily Chen"
role = "student"
max_turns = 2

[[participants]]
name = "Michael"

[gateway]
base_url = "http://localhost:11434/v1"
model = "llama3"
temperature = 0.7
timeout_seconds = 30

[transcript]
path = "out/panel.jsonl"
enabled = false

[summary]
enabled = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.max_rounds, 12);
        assert_eq!(config.moderator.name, "Alex");
        assert_eq!(config.participants.len(), 2);
        assert_eq!(config.participants[1].role, "panel participant");
        assert_eq!(config.gateway.model, "llama3");
        assert_eq!(config.gateway.api_key_env, "OPENAI_API_KEY");
        assert!(!config.transcript.enabled);
        assert!(!config.summary.enabled);

        let session = config.to_session_config(Vec::new()).unwrap();
        assert_eq!(session.topic, "Recycled denim pants");
        assert_eq!(session.termination_marker, "<END>");
        assert_eq!(session.participants[0].max_turns, 2);
        // Falls back to session.default_max_turns
        assert_eq!(session.participants[1].max_turns, 3);
        assert_eq!(session.moderator.display_name, "Alex");
        assert!(session.validate().is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.session.max_rounds, 20);
        assert_eq!(config.session.termination_marker, "TERMINATE");
        assert_eq!(config.session.default_max_turns, 6);
        assert_eq!(config.gateway.model, "gpt-4o");
        assert!(config.transcript.enabled);
        assert!(config.summary.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_topic() {
        let config = FileConfig::default();
        assert_eq!(
            config.to_session_config(Vec::new()).unwrap_err(),
            ConfigValidationError::MissingTopic
        );
    }

    #[test]
    fn test_extra_participants_follow_inline_ones() {
        let mut config: FileConfig = toml::from_str(
            r#"
[[participants]]
name = "Inline"
"#,
        )
        .unwrap();
        config.session.topic = Some("Pants".to_string());

        let session = config
            .to_session_config(vec![ParticipantSpec::new("Persona", "nurse", "p")])
            .unwrap();

        assert_eq!(session.participant_names(), vec!["Inline", "Persona"]);
    }

    #[test]
    fn test_validate_rejects_bad_gateway_settings() {
        let mut config = FileConfig::default();
        config.gateway.timeout_seconds = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));

        let mut config = FileConfig::default();
        config.gateway.model = " ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyModelName));

        let mut config = FileConfig::default();
        config.gateway.temperature = Some(3.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_participant_name() {
        let config: FileConfig = toml::from_str(
            r#"
[[participants]]
name = "Ok"

[[participants]]
name = ""
"#,
        )
        .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::EmptyParticipantName(1))
        );
    }

    #[test]
    fn test_execution_params_from_gateway() {
        let mut config = FileConfig::default();
        config.gateway.timeout_seconds = 45;
        let params = config.gateway.execution_params();
        assert_eq!(params.call_timeout, Duration::from_secs(45));
        assert_eq!(params.max_attempts(), 2);
    }
}
