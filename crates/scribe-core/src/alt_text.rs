use std::sync::Arc;

use futures_util::stream::{self, StreamExt};

use crate::prompts::{alt_text_prompt, fallback_alt_text, sanitize_alt_text};
use crate::services::ai::TextGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltTextSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltText {
    pub text: String,
    pub source: AltTextSource,
}

/// Produces alt text for one image path at a time.
///
/// Provider failures never propagate: they are logged and the image either
/// gets the fallback text or no suggestion at all.
#[derive(Debug, Clone)]
pub struct AltTextGenerator {
    generator: Arc<dyn TextGenerator>,
    fallback: Option<String>,
}

impl AltTextGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, fallback: Option<String>) -> Self {
        Self {
            generator,
            fallback,
        }
    }

    pub async fn describe(&self, path: &str) -> Option<AltText> {
        let prompt = alt_text_prompt(path);

        match self.generator.generate(&prompt).await {
            Ok(raw) => match sanitize_alt_text(&raw) {
                Some(text) => {
                    tracing::debug!("generated alt text for {}: {}", path, text);
                    return Some(AltText {
                        text,
                        source: AltTextSource::Generated,
                    });
                }
                None => tracing::warn!("Empty alt text returned for {}", path),
            },
            Err(e) => tracing::warn!("Alt text generation failed for {}: {:#}", path, e),
        }

        self.fallback.as_deref().map(|template| AltText {
            text: fallback_alt_text(template, path),
            source: AltTextSource::Fallback,
        })
    }

    /// Describe every path, keeping the input order.
    ///
    /// At most `concurrency` requests are in flight; 1 means one after another.
    pub async fn describe_all(&self, paths: &[String], concurrency: usize) -> Vec<Option<AltText>> {
        stream::iter(paths)
            .map(|path| self.describe(path))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}
