use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::services::ai::{Message, TextGenerator};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            tracing::debug!("OpenAI request failed: {}", error_text);
            anyhow::bail!("API request failed ({}): {}", status, error_text);
        }

        let chat_response: ChatResponse = response.json().await?;
        first_choice(chat_response)
    }
}

fn first_choice(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| anyhow::anyhow!("API response contained no completion"))
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn client(base_url: Option<&str>) -> OpenAiClient {
        let config = ProviderConfig::new(
            ProviderKind::OpenAi,
            Some("sk-test".to_string()),
            None,
            None,
            base_url.map(str::to_string),
            false,
        )
        .unwrap();
        OpenAiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client(None).endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            client(Some("http://localhost:1234/v1/")).endpoint(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_omits_unset_max_tokens() {
        let body = serde_json::to_value(ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![Message::user("hi")],
            max_tokens: None,
        })
        .unwrap();
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["model"], "gpt-4o-mini");
    }

    #[test]
    fn test_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":" Screenshot of the login page "}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(response).unwrap(), "Screenshot of the login page");

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(first_choice(response).is_err());
    }
}
