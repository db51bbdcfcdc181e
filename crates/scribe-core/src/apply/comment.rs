use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{rewrite_text, Suggestion};
use crate::services::github::{ReviewComment, ReviewRequest};

pub const COMMENT_HEADING: &str = "## Suggested alt text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommentFormat {
    /// One fenced ```diff block per file
    #[default]
    Diff,
    /// Bulleted `old → new` list
    List,
}

/// Old/new pair for one changed line (or one reference when no line is known)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub file: String,
    pub line: Option<u32>,
    pub old: String,
    pub new: String,
}

/// Group suggestions by file and line, rewriting each line once.
///
/// Order of first appearance is preserved.
pub fn line_changes(suggestions: &[Suggestion]) -> Vec<LineChange> {
    let mut groups: Vec<((String, Option<u32>), Vec<Suggestion>)> = Vec::new();

    for suggestion in suggestions {
        let file = suggestion.file.clone().unwrap_or_default();
        let key = (file, suggestion.line());
        let same_line = key.1.is_some() && suggestion.reference.line_text.is_some();

        match groups.iter_mut().find(|(k, _)| same_line && *k == key) {
            Some((_, group)) => group.push(suggestion.clone()),
            None => groups.push((key, vec![suggestion.clone()])),
        }
    }

    groups
        .into_iter()
        .map(|((file, line), group)| match &group[0].reference.line_text {
            Some(line_text) => LineChange {
                file,
                line,
                old: line_text.clone(),
                new: rewrite_text(line_text, &group),
            },
            None => LineChange {
                file,
                line,
                old: group[0].original().to_string(),
                new: group[0].replacement(),
            },
        })
        .filter(|change| change.old != change.new)
        .collect()
}

/// Body of the single issue comment listing every suggestion
pub fn format_comment_body(suggestions: &[Suggestion], format: CommentFormat) -> String {
    let changes = line_changes(suggestions);

    let mut body = String::new();
    body.push_str(COMMENT_HEADING);
    body.push_str("\n\n");
    body.push_str(&format!(
        "Found {} image reference(s) that could use alt text. Suggested replacements:\n",
        suggestions.len()
    ));

    match format {
        CommentFormat::Diff => {
            let mut by_file: BTreeMap<&str, Vec<&LineChange>> = BTreeMap::new();
            for change in &changes {
                by_file.entry(change.file.as_str()).or_default().push(change);
            }

            for (file, changes) in by_file {
                body.push_str(&format!("\n### `{}`\n\n```diff\n", file));
                for change in changes {
                    if let Some(line) = change.line {
                        body.push_str(&format!("@@ line {} @@\n", line));
                    }
                    body.push_str(&format!("-{}\n+{}\n", change.old, change.new));
                }
                body.push_str("```\n");
            }
        }
        CommentFormat::List => {
            body.push('\n');
            for change in &changes {
                let location = match change.line {
                    Some(line) => format!("{} line {}", inline_code(&change.file), line),
                    None => inline_code(&change.file),
                };
                body.push_str(&format!(
                    "- {}: {} → {}\n",
                    location,
                    inline_code(&change.old),
                    inline_code(&change.new)
                ));
            }
        }
    }

    body
}

/// Inline code span that survives backticks inside `text`.
///
/// The fence is one backtick longer than the longest run in `text`; padding
/// spaces keep a leading or trailing backtick from merging with the fence.
fn inline_code(text: &str) -> String {
    let longest = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or_default();
    if longest == 0 {
        return format!("`{}`", text);
    }

    let fence = "`".repeat(longest + 1);
    format!("{} {} {}", fence, text, fence)
}

/// One review with a ```suggestion comment per changed line.
///
/// Suggestions without a file or line cannot be anchored and are left out.
/// Returns `None` when nothing can be posted.
pub fn build_review(suggestions: &[Suggestion]) -> Option<ReviewRequest> {
    let comments: Vec<ReviewComment> = line_changes(suggestions)
        .into_iter()
        .filter_map(|change| {
            let line = change.line?;
            if change.file.is_empty() {
                return None;
            }
            let body = format!("Suggested alt text:\n\n```suggestion\n{}\n```", change.new);
            Some(ReviewComment::on_new_line(&change.file, line, body))
        })
        .collect();

    if comments.is_empty() {
        return None;
    }

    let body = format!(
        "{}\n\nSuggested alt text for {} line(s) in this pull request.",
        COMMENT_HEADING,
        comments.len()
    );
    Some(ReviewRequest::comment(body, comments))
}
