use anyhow::Result;
use std::fmt;
use std::path::Path;

use crate::alt_text::{AltTextGenerator, AltTextSource};
use crate::apply::{
    build_review, format_comment_body, line_changes, render_diff, rewrite_text,
    write_if_changed, CommentFormat, Suggestion,
};
use crate::images::{extract_from_patch, extract_missing_alt, AltPolicy, ImageReference};
use crate::services::github::PullRequestHost;
use crate::source::{pull_request_documents, scan_working_tree, DEFAULT_EXTENSIONS};

/// Counters reported at the end of a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    pub images: usize,
    pub generated: usize,
    pub fallback: usize,
    pub skipped: usize,
    pub updated: usize,
    pub posted: bool,
    /// Unified diffs of the files a dry run would rewrite
    pub previews: Vec<String>,
}

impl RunSummary {
    pub fn suggested(&self) -> usize {
        self.generated + self.fallback
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents, {} images, {} suggested ({} fallback), {} skipped, {} files updated",
            self.documents,
            self.images,
            self.suggested(),
            self.fallback,
            self.skipped,
            self.updated
        )
    }
}

#[derive(Debug, Clone)]
pub struct Scribe {
    describer: AltTextGenerator,
    extensions: Vec<String>,
    concurrency: usize,
}

impl Scribe {
    pub fn new(describer: AltTextGenerator) -> Self {
        Self {
            describer,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            concurrency: 1,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Generate alt text for each reference, in discovery order
    async fn suggest(
        &self,
        file: Option<&str>,
        references: Vec<ImageReference>,
        summary: &mut RunSummary,
    ) -> Vec<Suggestion> {
        let paths: Vec<String> = references.iter().map(|r| r.path.clone()).collect();
        let descriptions = self.describer.describe_all(&paths, self.concurrency).await;

        let mut suggestions = Vec::new();
        for (reference, description) in references.into_iter().zip(descriptions) {
            match description {
                Some(alt) => {
                    let suggestion = Suggestion {
                        file: file.map(str::to_string),
                        reference,
                        alt_text: alt.text,
                        source: alt.source,
                    };
                    if suggestion.replacement() == suggestion.original() {
                        summary.skipped += 1;
                        tracing::info!(
                            "Alt text for {} is unchanged, skipping",
                            suggestion.reference.path
                        );
                        continue;
                    }

                    match suggestion.source {
                        AltTextSource::Generated => summary.generated += 1,
                        AltTextSource::Fallback => summary.fallback += 1,
                    }
                    suggestions.push(suggestion);
                }
                None => {
                    summary.skipped += 1;
                    tracing::info!("No alt text for {}, skipping", reference.path);
                }
            }
        }
        suggestions
    }

    /// Fill in empty alt text in every markdown file under `root`.
    ///
    /// With `dry_run` nothing is written and the would-be changes are
    /// returned as unified diffs in `previews`.
    pub async fn rewrite_tree(&self, root: &Path, dry_run: bool) -> Result<RunSummary> {
        let documents = scan_working_tree(root, &self.extensions).await?;
        let mut summary = RunSummary {
            documents: documents.len(),
            ..Default::default()
        };

        for document in documents {
            let text = document.text();
            let references: Vec<ImageReference> = extract_missing_alt(text).collect();
            if references.is_empty() {
                continue;
            }

            tracing::info!(
                "{}: {} image(s) missing alt text",
                document.path.display(),
                references.len()
            );
            summary.images += references.len();

            let suggestions = self.suggest(None, references, &mut summary).await;
            let updated = rewrite_text(text, &suggestions);

            if dry_run {
                if updated != text {
                    let shown = document
                        .path
                        .strip_prefix(root)
                        .unwrap_or(&document.path)
                        .to_string_lossy()
                        .replace('\\', "/");
                    summary.previews.push(render_diff(&shown, text, &updated));
                }
            } else if write_if_changed(&document.path, text, &updated).await? {
                summary.updated += 1;
            }
        }

        Ok(summary)
    }

    /// Suggestions for the added lines of a pull request's markdown files
    pub async fn collect_pull_request(
        &self,
        host: &dyn PullRequestHost,
        number: u64,
        policy: AltPolicy,
    ) -> Result<(Vec<Suggestion>, RunSummary)> {
        let documents = pull_request_documents(host, number, &self.extensions).await?;
        let mut summary = RunSummary {
            documents: documents.len(),
            ..Default::default()
        };

        let mut suggestions = Vec::new();
        for document in documents {
            let references = extract_from_patch(document.text(), policy);
            if references.is_empty() {
                continue;
            }

            let file = document.display_path();
            tracing::info!("{}: {} image(s) to describe", file, references.len());
            summary.images += references.len();
            suggestions.extend(self.suggest(Some(&file), references, &mut summary).await);
        }

        Ok((suggestions, summary))
    }

    /// Post every suggestion as one issue comment on the pull request
    pub async fn comment_on_pull_request(
        &self,
        host: &dyn PullRequestHost,
        number: u64,
        policy: AltPolicy,
        format: CommentFormat,
    ) -> Result<RunSummary> {
        let (suggestions, mut summary) = self.collect_pull_request(host, number, policy).await?;
        if line_changes(&suggestions).is_empty() {
            tracing::info!("No images missing alt text, nothing to suggest");
            return Ok(summary);
        }

        let body = format_comment_body(&suggestions, format);
        let posted = host.post_issue_comment(number, &body).await?;
        tracing::info!(
            "Posted alt text suggestions on pull request #{}: {}",
            number,
            posted.html_url.as_deref().unwrap_or("(no url)")
        );
        summary.posted = true;
        Ok(summary)
    }

    /// Post suggestions as one review with line-anchored comments
    pub async fn review_pull_request(
        &self,
        host: &dyn PullRequestHost,
        number: u64,
        policy: AltPolicy,
    ) -> Result<RunSummary> {
        let (suggestions, mut summary) = self.collect_pull_request(host, number, policy).await?;

        let Some(review) = build_review(&suggestions) else {
            tracing::info!("No images missing alt text, nothing to suggest");
            return Ok(summary);
        };

        let posted = host.create_review(number, &review).await?;
        tracing::info!(
            "Posted review with {} comment(s) on pull request #{}: {}",
            review.comments.len(),
            number,
            posted.html_url.as_deref().unwrap_or("(no url)")
        );
        summary.posted = true;
        Ok(summary)
    }
}
