use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::{ChatClient, ChatMessage, ChatRequest};
use crate::config::TranslatorConfig;
use crate::error::{Error, Result};

/// OpenAI-compatible chat completion client
/// Works with: OpenRouter, OpenAI, DeepSeek, Ollama, llama.cpp server, etc.
pub struct OpenAiClient {
    client: Client,
    /// Base URL for the API (e.g., "https://openrouter.ai/api/v1")
    pub api_base: String,
    /// Model identifier
    pub model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client bound to `api_key`
    pub fn new(config: &TranslatorConfig, api_key: impl Into<String>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    fn name(&self) -> &'static str {
        "OpenAI Compatible"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>> {
        let url = self.endpoint();
        let body = WireRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!("Chat completion request to {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request failed: {}", e);
                if e.is_timeout() {
                    Error::Transport("request timed out".to_string())
                } else {
                    Error::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API error: {} - {}", status, body);
            return Err(Error::Transport(format!("HTTP {status}: {body}")));
        }

        let chat_response = response.json::<ChatResponse>().await.map_err(|e| {
            warn!("Failed to parse response: {}", e);
            Error::Transport(format!("invalid response body: {e}"))
        })?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hello")],
            temperature: 0.1,
            max_tokens: 15,
        }
    }

    fn client_for(server: &MockServer) -> OpenAiClient {
        let config = TranslatorConfig::new(format!("{}/v1/", server.uri()), "test-model");
        OpenAiClient::new(&config, "sk-test").unwrap()
    }

    #[tokio::test]
    async fn test_sends_bearer_and_body_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "temperature": 0.1,
                "max_tokens": 15,
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "bonjour"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let content = client.complete(&request()).await.unwrap();
        assert_eq!(content.as_deref(), Some("bonjour"));
    }

    #[tokio::test]
    async fn test_no_choices_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.complete(&request()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_null_content_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.complete(&request()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_http_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_garbage_body_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
