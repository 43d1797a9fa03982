//! OpenAI-compatible chat-completions client
//!
//! Direct HTTP client for `/chat/completions`. Works with any endpoint that
//! speaks the same wire format (set `OPENAI_BASE_URL`).

use anyhow::{Context, Result};
use reqwest::Client;

use super::provider::LlmProvider;
use super::types::{ChatMessage, ChatRequest, ChatResponse, ToolDefinition};
use crate::core::{AgentError, LlmConfig};

/// Chat-completions provider
pub struct OpenAiProvider {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    /// Create a provider from configuration
    ///
    /// Fails when no API key is configured.
    pub fn new(config: &LlmConfig) -> Result<Self, AgentError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AgentError::MissingConfig("OPENAI_API_KEY".into()))?;

        tracing::info!("[OpenAi] Using model: {}", config.model);

        Ok(Self {
            client: Client::new(),
            api_base: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.to_vec())
            },
        };

        tracing::debug!(
            "[OpenAi] Sending {} messages with {} tools",
            request.messages.len(),
            tools.len()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to chat-completions API")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read chat-completions response body")?;

        tracing::debug!("[OpenAi] Response status: {}", status);

        if !status.is_success() {
            tracing::error!("[OpenAi] API error: {} - {}", status, response_text);
            return Err(AgentError::Api {
                status: status.as_u16(),
                body: response_text,
            }
            .into());
        }

        let parsed: ChatResponse = serde_json::from_str(&response_text)
            .context("Failed to parse chat-completions response")?;

        if let Some(usage) = parsed.usage {
            tracing::debug!(
                "[OpenAi] Usage: {} prompt / {} completion tokens",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .context("Chat-completions response contained no choices")?;

        tracing::debug!(
            "[OpenAi] finish_reason={:?}, tool_calls={}",
            choice.finish_reason,
            choice.message.tool_calls().len()
        );

        Ok(choice.message)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> LlmConfig {
        LlmConfig {
            base_url: base_url.to_string(),
            api_key: Some("sk-test".to_string()),
            model: "gpt-test".to_string(),
        }
    }

    #[test]
    fn test_missing_key() {
        let mut cfg = config("http://localhost");
        cfg.api_key = None;
        assert!(matches!(
            OpenAiProvider::new(&cfg),
            Err(AgentError::MissingConfig(ref v)) if v == "OPENAI_API_KEY"
        ));
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "hello"}}]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&config(&server.uri())).unwrap();
        let reply = provider
            .complete(&[ChatMessage::user("hi")], &[])
            .await
            .unwrap();
        assert_eq!(reply.text(), "hello");
        assert_eq!(provider.model(), "gpt-test");
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&config(&server.uri())).unwrap();
        let err = provider
            .complete(&[ChatMessage::user("hi")], &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
