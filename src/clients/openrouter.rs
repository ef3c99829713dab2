//! OpenRouter chat completions client

use super::{status_error, ChatClient};
use crate::{EiraError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_CHAT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_CHAT_MODEL: &str = "mistralai/mistral-7b-instruct";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EiraError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            base_url: DEFAULT_CHAT_BASE_URL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatClient for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Chat request to {} ({} chars)", self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("Chat service", status, &body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| EiraError::ParseError(format!("Malformed chat response: {}", e)))?;

        let reply = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EiraError::ParseError("Chat response had no message content".into()))?;

        info!("Chat reply received ({} chars)", reply.len());
        Ok(reply.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_trims_base_url() {
        let client = OpenRouterClient::new("key")
            .unwrap()
            .with_base_url("http://localhost:9999/")
            .with_model("other/model");
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.model(), "other/model");
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: DEFAULT_CHAT_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "tell me a joke",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "mistralai/mistral-7b-instruct");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "tell me a joke");
    }
}
