//! Summarize Panel use case
//!
//! Asks a researcher role to condense the participants' contributions of a
//! finished session into a structured findings report.

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use chrono::Utc;
use panel_domain::{Message, PanelPromptTemplate, Speaker};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const SUMMARIZER_NAME: &str = "Researcher";

/// Errors that can occur while summarizing
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Transcript has no participant messages to summarize")]
    NothingToSummarize,

    #[error("Summary generation failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Summary cancelled")]
    Cancelled,
}

/// Use case for summarizing a panel transcript
pub struct SummarizePanelUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: ExecutionParams,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> SummarizePanelUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            params: ExecutionParams::default(),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Summarize the participant messages of `transcript`.
    ///
    /// Moderator messages are left out of the report input.
    pub async fn execute(&self, transcript: &[Message]) -> Result<String, SummarizeError> {
        let contents: Vec<&str> = transcript
            .iter()
            .filter(|m| !m.is_from_moderator())
            .map(|m| m.content())
            .collect();
        if contents.is_empty() {
            return Err(SummarizeError::NothingToSummarize);
        }

        info!("Summarizing {} participant messages", contents.len());

        let request = Message::new(
            Speaker::Moderator,
            SUMMARIZER_NAME,
            PanelPromptTemplate::summary_prompt(&contents),
            1,
            Utc::now(),
        );
        let system_prompt = PanelPromptTemplate::summary_system();
        let history = [request];

        let max_attempts = self.params.max_attempts();
        let mut attempt = 1;
        loop {
            let call = tokio::time::timeout(
                self.params.call_timeout,
                self.gateway.generate(&system_prompt, &history),
            );

            let result = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        info!("Summary cancelled");
                        return Err(SummarizeError::Cancelled);
                    }
                    result = call => result,
                }
            } else {
                call.await
            }
            .unwrap_or(Err(GatewayError::Timeout));

            match result {
                Ok(summary) => return Ok(summary),
                Err(e) if attempt < max_attempts => {
                    warn!("Summary attempt {}/{} failed: {}", attempt, max_attempts, e);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use panel_domain::ParticipantId;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    struct CapturingGateway {
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        prompts: Mutex<Vec<(String, String)>>,
        delay: Option<Duration>,
    }

    impl CapturingGateway {
        fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl LlmGateway for CapturingGateway {
        async fn generate(
            &self,
            system_prompt: &str,
            history: &[Message],
        ) -> Result<String, GatewayError> {
            let user = history
                .iter()
                .map(|m| m.content())
                .collect::<Vec<_>>()
                .join("\n");
            self.prompts
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("no reply scripted".to_string())))
        }
    }

    fn transcript() -> Vec<Message> {
        let emily = ParticipantId::new("Emily");
        let sarah = ParticipantId::new("Sarah");
        vec![
            Message::new(Speaker::Moderator, "Moderator", "What do you think?", 1, Utc::now()),
            Message::new(Speaker::Participant(emily), "Emily", "Too pricey", 2, Utc::now()),
            Message::new(Speaker::Moderator, "Moderator", "Sarah?", 3, Utc::now()),
            Message::new(Speaker::Participant(sarah), "Sarah", "Love the colors", 4, Utc::now()),
        ]
    }

    #[tokio::test]
    async fn test_summary_uses_participant_messages_only() {
        let gateway = Arc::new(CapturingGateway::new(vec![Ok(
            "Research Study: Pants".to_string()
        )]));
        let use_case = SummarizePanelUseCase::new(Arc::clone(&gateway));

        let summary = use_case.execute(&transcript()).await.unwrap();

        assert_eq!(summary, "Research Study: Pants");
        let prompts = gateway.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let (system, user) = &prompts[0];
        assert!(system.contains("Pain Points"));
        assert!(user.contains("Too pricey\n>>>\nLove the colors"));
        assert!(!user.contains("What do you think?"));
    }

    #[tokio::test]
    async fn test_summary_retries_once() {
        let gateway = Arc::new(CapturingGateway::new(vec![
            Err(GatewayError::ConnectionError("reset".to_string())),
            Ok("done".to_string()),
        ]));
        let use_case = SummarizePanelUseCase::new(Arc::clone(&gateway));

        assert_eq!(use_case.execute(&transcript()).await.unwrap(), "done");
        assert_eq!(gateway.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_summary_gives_up_after_retry() {
        let gateway = Arc::new(CapturingGateway::new(vec![]));
        let use_case = SummarizePanelUseCase::new(Arc::clone(&gateway));

        let result = use_case.execute(&transcript()).await;

        assert!(matches!(result, Err(SummarizeError::Gateway(_))));
        assert_eq!(gateway.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_moderator_only_transcript_is_rejected() {
        let gateway = Arc::new(CapturingGateway::new(vec![]));
        let use_case = SummarizePanelUseCase::new(Arc::clone(&gateway));
        let transcript = vec![Message::new(
            Speaker::Moderator,
            "Moderator",
            "Hello?",
            1,
            Utc::now(),
        )];

        assert!(matches!(
            use_case.execute(&transcript).await,
            Err(SummarizeError::NothingToSummarize)
        ));
        assert!(gateway.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_stops_slow_summary() {
        let gateway = Arc::new(
            CapturingGateway::new(vec![Ok("too late".to_string())])
                .with_delay(Duration::from_secs(30)),
        );
        let token = CancellationToken::new();
        let use_case = SummarizePanelUseCase::new(Arc::clone(&gateway))
            .with_cancellation(token.clone());

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let result = use_case.execute(&transcript()).await;

        assert!(matches!(result, Err(SummarizeError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(gateway.prompts.lock().unwrap().len(), 1);
    }
}
