use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{ProviderConfig, DEFAULT_MAX_TOKENS};
use crate::services::ai::{Message, TextGenerator};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("ANTHROPIC_API_KEY environment variable not set"))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    fn request_body(&self, message: &str) -> ClaudeRequest {
        ClaudeRequest {
            model: self.model.clone(),
            messages: vec![Message::user(message)],
            max_tokens: self.max_tokens,
        }
    }

    pub async fn send_message(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url.trim_end_matches('/')))
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&self.request_body(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            tracing::debug!("Anthropic request failed: {}", error_text);
            anyhow::bail!("API request failed ({}): {}", status, error_text);
        }

        let claude_response: ClaudeResponse = response.json().await?;
        first_text(claude_response)
    }
}

fn first_text(response: ClaudeResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .find(|c| c.content_type == "text")
        .and_then(|c| c.text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| anyhow::anyhow!("API response contained no text"))
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.send_message(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn config(max_tokens: Option<u32>) -> ProviderConfig {
        ProviderConfig::new(
            ProviderKind::Anthropic,
            Some("test-key".to_string()),
            None,
            max_tokens,
            None,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_request_body() {
        let client = AnthropicClient::new(&config(None)).unwrap();
        let body = serde_json::to_value(client.request_body("hello")).unwrap();
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");

        let client = AnthropicClient::new(&config(Some(42))).unwrap();
        assert_eq!(client.request_body("hello").max_tokens, 42);
    }

    #[test]
    fn test_first_text() {
        let response: ClaudeResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"  Diagram of the setup flow \n"}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(response).unwrap(), "Diagram of the setup flow");

        let response: ClaudeResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(first_text(response).is_err());
    }

    #[test]
    fn test_missing_key_is_error() {
        let config =
            ProviderConfig::new(ProviderKind::Anthropic, None, None, None, None, true).unwrap();
        assert!(AnthropicClient::new(&config).is_err());
    }
}
