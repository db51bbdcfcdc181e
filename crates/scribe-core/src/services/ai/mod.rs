use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{ProviderConfig, ProviderKind};
use crate::services::anthropic::AnthropicClient;
use crate::services::gemini::GeminiClient;
use crate::services::openai::OpenAiClient;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Turns a prompt into generated text. One call is one provider round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Stands in for a provider whose API key is absent in lenient mode.
#[derive(Debug, Clone)]
pub struct UnavailableGenerator {
    key_var: &'static str,
}

impl UnavailableGenerator {
    pub fn new(key_var: &'static str) -> Self {
        Self { key_var }
    }
}

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("{} not set, text generation unavailable", self.key_var)
    }
}

pub fn build_generator(config: &ProviderConfig) -> Result<Arc<dyn TextGenerator>> {
    if config.api_key.is_none() {
        tracing::warn!(
            "{} not set, every image will use the fallback alt text",
            config.kind.key_var()
        );
        return Ok(Arc::new(UnavailableGenerator::new(config.kind.key_var())));
    }

    let generator: Arc<dyn TextGenerator> = match config.kind {
        ProviderKind::Anthropic => Arc::new(AnthropicClient::new(config)?),
        ProviderKind::OpenAi => Arc::new(OpenAiClient::new(config)?),
        ProviderKind::Gemini => Arc::new(GeminiClient::new(config)?),
    };
    Ok(generator)
}
