//! OpenAI-compatible chat completions gateway

use crate::config::FileGatewayConfig;
use async_trait::async_trait;
use panel_application::ports::llm_gateway::{GatewayError, LlmGateway};
use panel_domain::Message;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Connection settings for [`OpenAiLlmGateway`]
#[derive(Debug, Clone)]
pub struct OpenAiGatewayConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl OpenAiGatewayConfig {
    /// Build from the `[gateway]` section, reading the key from the
    /// configured environment variable.
    pub fn from_file_config(config: &FileGatewayConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            GatewayError::Other(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        if api_key.trim().is_empty() {
            return Err(GatewayError::Other(format!(
                "environment variable {} is empty",
                config.api_key_env
            )));
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

/// [`LlmGateway`] over an OpenAI-compatible `/chat/completions` endpoint
///
/// Timeouts and retries are left to the caller; the client itself has no
/// request timeout.
pub struct OpenAiLlmGateway {
    client: Client,
    config: OpenAiGatewayConfig,
}

impl OpenAiLlmGateway {
    pub fn new(config: OpenAiGatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn build_request<'a>(&'a self, system_prompt: &'a str, history: &[Message]) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: system_prompt.to_string(),
        });
        messages.extend(history.iter().map(|m| ChatMessage {
            role: "user",
            content: format!("{}: {}", m.speaker_name(), m.content()),
        }));

        ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl LlmGateway for OpenAiLlmGateway {
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[Message],
    ) -> Result<String, GatewayError> {
        let request = self.build_request(system_prompt, history);
        debug!(
            "POST {} ({} messages, model {})",
            self.endpoint(),
            request.messages.len(),
            self.config.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else if e.is_connect() {
                    GatewayError::ConnectionError(e.to_string())
                } else {
                    GatewayError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        extract_content(body)
    }
}

fn status_error(status: StatusCode, body: &str) -> GatewayError {
    let detail = format!("{}: {}", status, body.trim());
    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => {
            GatewayError::QuotaExceeded(detail)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        s if s.is_server_error() => GatewayError::ConnectionError(detail),
        _ => GatewayError::RequestFailed(detail),
    }
}

fn extract_content(response: ChatResponse) -> Result<String, GatewayError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| GatewayError::InvalidResponse("no content in completion".to_string()))
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use panel_domain::{ParticipantId, Speaker};

    fn gateway() -> OpenAiLlmGateway {
        OpenAiLlmGateway::new(OpenAiGatewayConfig {
            base_url: "http://localhost:8080/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key: "sk-test".to_string(),
            temperature: Some(0.5),
            max_tokens: None,
        })
    }

    #[test]
    fn test_request_prefixes_speaker_names() {
        let gateway = gateway();
        let history = vec![
            Message::new(Speaker::Moderator, "Moderator", "Thoughts?", 1, Utc::now()),
            Message::new(
                Speaker::Participant(ParticipantId::new("Emily")),
                "Emily",
                "Nice color",
                2,
                Utc::now(),
            ),
        ];

        let request = gateway.build_request("be brief", &history);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be brief");
        assert_eq!(json["messages"][2]["role"], "user");
        assert_eq!(json["messages"][2]["content"], "Emily: Nice color");
        assert_eq!(json["temperature"], 0.5);
        assert!(json.get("max_tokens").is_none());
        assert_eq!(gateway.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_extract_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(response).unwrap(), "Hello");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_content(empty),
            Err(GatewayError::InvalidResponse(_))
        ));

        let null: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(extract_content(null).is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            GatewayError::QuotaExceeded(_)
        ));
        assert_eq!(
            status_error(StatusCode::GATEWAY_TIMEOUT, ""),
            GatewayError::Timeout
        );
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, ""),
            GatewayError::ConnectionError(_)
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "bad key"),
            GatewayError::RequestFailed(d) if d.contains("bad key")
        ));
    }

    #[test]
    fn test_config_requires_api_key_variable() {
        let file = FileGatewayConfig {
            api_key_env: "PANEL_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..FileGatewayConfig::default()
        };
        assert!(matches!(
            OpenAiGatewayConfig::from_file_config(&file),
            Err(GatewayError::Other(_))
        ));
    }
}
