//! Run Panel use case
//!
//! Drives one moderated panel session: the turn-taking state machine,
//! least-spoken-first speaker selection, termination detection and
//! transcript relay.
//!
//! ```text
//! AwaitingModerator ──select──▶ AwaitingParticipant ──reply──▶ AwaitingModerator
//!        │                              │
//!        └──────────── Terminated ◀─────┘
//! ```

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, PanelProgressNotifier};
use crate::ports::transcript_listener::TranscriptListener;
use crate::ports::transcript_store::{NoTranscriptStore, TranscriptStore};
use crate::transcript::TranscriptSink;
use panel_domain::{
    ConversationState, ConversationStatus, DomainError, MarkerDetector, Message,
    PanelPromptTemplate, ParticipantId, SessionConfig, SessionOutcome, Speaker, TerminalStatus,
    TerminationDetector, TurnState, TurnTally,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that prevent a panel session from starting
///
/// Once a session has started, every failure is reported through
/// [`SessionOutcome::status`] instead.
#[derive(Error, Debug)]
pub enum RunPanelError {
    #[error("Invalid session configuration: {0}")]
    Configuration(#[from] DomainError),
}

/// Input for the RunPanel use case
#[derive(Debug, Clone)]
pub struct RunPanelInput {
    pub config: SessionConfig,
}

impl RunPanelInput {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }
}

impl From<SessionConfig> for RunPanelInput {
    fn from(config: SessionConfig) -> Self {
        Self::new(config)
    }
}

/// Why a generation step produced no content
enum StepFailure {
    Cancelled,
    Gateway { error: GatewayError, attempts: u32 },
}

/// Working set of one running session
struct PanelSession<'a> {
    config: &'a SessionConfig,
    state: ConversationState,
    sink: TranscriptSink,
    detector: Arc<dyn TerminationDetector>,
    moderator_system: String,
    warnings: Vec<String>,
    error: Option<String>,
}

impl PanelSession<'_> {
    /// Record a message; returns whether it carries the termination signal.
    fn record(
        &mut self,
        speaker: Speaker,
        speaker_name: &str,
        content: String,
    ) -> Result<bool, DomainError> {
        // Store and listeners must never see a message the history rejects
        self.state.can_record(&speaker)?;
        let receipt = self.sink.append(speaker, speaker_name, content);
        if let Some(e) = receipt.persistence_error {
            self.warnings.push(format!(
                "transcript record #{} was not persisted: {}",
                receipt.message.sequence_number(),
                e
            ));
        }
        let terminal = self.detector.detect(receipt.message.content());
        self.state.record(receipt.message)?;
        Ok(terminal)
    }

    fn fail(&mut self, reason: String) {
        warn!("Panel session failed: {}", reason);
        self.error = Some(reason);
        self.state.terminate(TerminalStatus::Error);
    }

    fn abort(&mut self, speaker: &str, failure: StepFailure) {
        match failure {
            StepFailure::Cancelled => {
                info!("Panel session cancelled while waiting for {}", speaker);
                self.state.terminate(TerminalStatus::Cancelled);
            }
            StepFailure::Gateway { error, attempts } => {
                self.fail(format!(
                    "generation for {} failed after {} attempt(s): {}",
                    speaker, attempts, error
                ));
            }
        }
    }

    fn moderator_name(&self) -> String {
        self.state.moderator().display_name.clone()
    }
}

/// Use case for running a panel session
pub struct RunPanelUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    store: Arc<dyn TranscriptStore>,
    listeners: Vec<Arc<dyn TranscriptListener>>,
    detector: Option<Arc<dyn TerminationDetector>>,
    params: ExecutionParams,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> RunPanelUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            store: Arc::new(NoTranscriptStore),
            listeners: Vec::new(),
            detector: None,
            params: ExecutionParams::default(),
            cancellation_token: None,
        }
    }

    /// Durable store receiving every transcript record
    pub fn with_transcript_store(mut self, store: Arc<dyn TranscriptStore>) -> Self {
        self.store = store;
        self
    }

    /// Register a live transcript subscriber
    pub fn with_listener(mut self, listener: Arc<dyn TranscriptListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Replace the marker detector built from the session config
    pub fn with_detector(mut self, detector: Arc<dyn TerminationDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunPanelInput) -> Result<SessionOutcome, RunPanelError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunPanelInput,
        progress: &dyn PanelProgressNotifier,
    ) -> Result<SessionOutcome, RunPanelError> {
        let config = &input.config;
        let state = ConversationState::from_config(config)?;

        info!(
            "Starting panel with {} participants (max {} rounds)",
            config.participants.len(),
            config.max_rounds
        );

        let mut sink = TranscriptSink::new(Arc::clone(&self.store));
        for listener in &self.listeners {
            sink.subscribe(Arc::clone(listener));
        }

        let detector = self.detector.clone().unwrap_or_else(|| {
            Arc::new(MarkerDetector::new(config.termination_marker.clone()))
        });
        let moderator_system = PanelPromptTemplate::moderator_system(
            &config.moderator,
            &config.participant_names(),
            &config.topic,
        );

        let mut session = PanelSession {
            config,
            state,
            sink,
            detector,
            moderator_system,
            warnings: Vec::new(),
            error: None,
        };

        // The topic stands in for the moderator's opening turn
        let moderator_name = session.moderator_name();
        match session.record(Speaker::Moderator, &moderator_name, config.topic.clone()) {
            Ok(true) => session.state.terminate(TerminalStatus::NormalEnd),
            Ok(false) => {}
            Err(e) => session.fail(e.to_string()),
        }

        loop {
            if self.is_cancelled() {
                info!("Panel session cancelled");
                session.state.terminate(TerminalStatus::Cancelled);
            }

            match session.state.turn().clone() {
                TurnState::Terminated(_) => break,
                TurnState::AwaitingModerator => self.moderator_step(&mut session, progress).await,
                TurnState::AwaitingParticipant(id) => {
                    self.participant_step(&mut session, id, progress).await
                }
            }
        }

        if let Err(e) = session.sink.flush() {
            warn!("Failed to flush transcript: {}", e);
            session
                .warnings
                .push(format!("transcript flush failed: {}", e));
        }

        let status = match session.state.status() {
            ConversationStatus::Terminated(status) => status,
            ConversationStatus::Active => TerminalStatus::Error,
        };
        let rounds = session.state.round();
        info!("Panel finished with {} after {} rounds", status, rounds);
        progress.on_session_end(status, rounds);

        let tallies = session.state.participants().map(TurnTally::from).collect();
        Ok(SessionOutcome {
            status,
            transcript: session.state.into_history(),
            rounds,
            tallies,
            warnings: session.warnings,
            error: session.error,
        })
    }

    /// `AwaitingModerator`: check limits, let the moderator speak, pick the
    /// next participant.
    async fn moderator_step(
        &self,
        session: &mut PanelSession<'_>,
        progress: &dyn PanelProgressNotifier,
    ) {
        let Some(next) = session.state.pool().next_speaker() else {
            info!("Every participant has used its turn quota");
            session.state.terminate(TerminalStatus::FairnessExhausted);
            return;
        };

        if session.state.round() >= session.config.max_rounds {
            info!("Round limit of {} reached", session.config.max_rounds);
            session.state.terminate(TerminalStatus::RoundLimit);
            return;
        }

        let next_name = session
            .state
            .pool()
            .get(&next)
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| next.to_string());

        // Round 0 already has the opening topic as the moderator's message
        if session.state.round() > 0 {
            let moderator_name = session.moderator_name();
            let system_prompt =
                PanelPromptTemplate::moderator_turn(&session.moderator_system, &next_name);
            let result = self
                .generate(
                    &moderator_name,
                    &system_prompt,
                    session.state.history(),
                    progress,
                )
                .await;

            match result {
                Ok(content) => match session.record(Speaker::Moderator, &moderator_name, content) {
                    Ok(true) => {
                        info!("Moderator ended the session");
                        session.state.terminate(TerminalStatus::NormalEnd);
                        return;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        session.fail(e.to_string());
                        return;
                    }
                },
                Err(failure) => {
                    session.abort(&moderator_name, failure);
                    return;
                }
            }
        }

        if let Err(e) = session.state.select_participant(next.clone()) {
            session.fail(format!("speaker selection failed: {}", e));
            return;
        }

        if let Some(p) = session.state.pool().get(&next) {
            debug!(
                "Selected {} ({}/{} turns taken)",
                p.display_name(),
                p.turns_taken(),
                p.max_turns()
            );
            progress.on_participant_selected(p.display_name(), p.turns_taken() + 1, p.max_turns());
        }
    }

    /// `AwaitingParticipant`: get the selected participant's reply and close
    /// the round.
    async fn participant_step(
        &self,
        session: &mut PanelSession<'_>,
        id: ParticipantId,
        progress: &dyn PanelProgressNotifier,
    ) {
        let Some(participant) = session.state.pool().get(&id) else {
            session.fail(format!("selected participant {} is not registered", id));
            return;
        };
        let name = participant.display_name().to_string();
        let system_prompt =
            PanelPromptTemplate::participant_system(participant, &session.config.topic);

        let result = self
            .generate(&name, &system_prompt, session.state.history(), progress)
            .await;

        let content = match result {
            Ok(content) => content,
            Err(failure) => {
                session.abort(&name, failure);
                return;
            }
        };

        let terminal = match session.record(Speaker::Participant(id), &name, content) {
            Ok(terminal) => terminal,
            Err(e) => {
                session.fail(e.to_string());
                return;
            }
        };

        match session.state.complete_participant_turn() {
            Ok(round) => debug!("Round {} complete", round),
            Err(e) => {
                session.fail(e.to_string());
                return;
            }
        }

        if terminal {
            info!("{} ended the session", name);
            session.state.terminate(TerminalStatus::NormalEnd);
        }
    }

    /// Issue one generation request with timeout, one retry and
    /// cancellation.
    async fn generate(
        &self,
        speaker: &str,
        system_prompt: &str,
        history: &[Message],
        progress: &dyn PanelProgressNotifier,
    ) -> Result<String, StepFailure> {
        let max_attempts = self.params.max_attempts();
        progress.on_generation_start(speaker);

        let mut attempt = 1;
        loop {
            let call = tokio::time::timeout(
                self.params.call_timeout,
                self.gateway.generate(system_prompt, history),
            );

            let result = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        progress.on_generation_complete(speaker, false);
                        return Err(StepFailure::Cancelled);
                    }
                    result = call => result,
                }
            } else {
                call.await
            };

            let error = match result {
                Ok(Ok(content)) => {
                    progress.on_generation_complete(speaker, true);
                    return Ok(content);
                }
                Ok(Err(e)) => e,
                Err(_) => GatewayError::Timeout,
            };

            if attempt >= max_attempts {
                progress.on_generation_complete(speaker, false);
                return Err(StepFailure::Gateway {
                    error,
                    attempts: attempt,
                });
            }

            warn!(
                "Generation for {} failed (attempt {}/{}): {}",
                speaker, attempt, max_attempts, error
            );
            progress.on_retry(speaker, attempt, &error);
            attempt += 1;
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|t| t.is_cancelled())
    }
}
