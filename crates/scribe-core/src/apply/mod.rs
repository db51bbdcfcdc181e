mod comment;

pub use comment::*;

use anyhow::{Context, Result};
use similar::TextDiff;
use std::path::Path;
use tokio::fs;

use crate::alt_text::AltTextSource;
use crate::images::ImageReference;

/// Generated alt text for one image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Repository path of the document (pull request mode)
    pub file: Option<String>,
    pub reference: ImageReference,
    pub alt_text: String,
    pub source: AltTextSource,
}

impl Suggestion {
    pub fn original(&self) -> &str {
        &self.reference.markdown
    }

    pub fn line(&self) -> Option<u32> {
        self.reference.line
    }

    /// `![alt](target)` with the target kept byte for byte
    pub fn replacement(&self) -> String {
        format!("![{}]({})", self.alt_text, self.reference.target)
    }
}

/// Substitute every suggestion into `text` by span.
///
/// Spans that do not point at the suggestion's original markdown are left alone.
pub fn rewrite_text(text: &str, suggestions: &[Suggestion]) -> String {
    let mut ordered: Vec<&Suggestion> = suggestions.iter().collect();
    ordered.sort_by_key(|s| s.reference.span.start);

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for suggestion in ordered {
        let span = suggestion.reference.span.clone();
        if span.start < cursor || text.get(span.clone()) != Some(suggestion.original()) {
            tracing::debug!("stale span for {}, skipping", suggestion.original());
            continue;
        }
        result.push_str(&text[cursor..span.start]);
        result.push_str(&suggestion.replacement());
        cursor = span.end;
    }
    result.push_str(&text[cursor..]);
    result
}

/// Overwrite `path` when the content changed. Returns whether a write happened.
pub async fn write_if_changed(path: &Path, original: &str, updated: &str) -> Result<bool> {
    if original == updated {
        return Ok(false);
    }

    fs::write(path, updated)
        .await
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!("Updated {}", path.display());
    Ok(true)
}

/// Unified diff between the current and rewritten content
pub fn render_diff(path: &str, original: &str, updated: &str) -> String {
    let diff = TextDiff::from_lines(original, updated);
    let old_header = format!("a/{}", path);
    let new_header = format!("b/{}", path);
    format!(
        "{}",
        diff.unified_diff()
            .context_radius(1)
            .header(&old_header, &new_header)
    )
}
