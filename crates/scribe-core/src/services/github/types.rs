use serde::{Deserialize, Serialize};

/// Entry of `GET /repos/{owner}/{repo}/pulls/{number}/files`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestFile {
    pub filename: String,
    #[serde(default)]
    pub status: String,
    /// Omitted by GitHub for binary files and very large diffs
    #[serde(default)]
    pub patch: Option<String>,
}

impl PullRequestFile {
    pub fn is_removed(&self) -> bool {
        self.status == "removed"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub path: String,
    pub line: u32,
    pub side: String,
    pub body: String,
}

impl ReviewComment {
    /// Comment anchored on a line of the new file
    pub fn on_new_line(path: &str, line: u32, body: String) -> Self {
        Self {
            path: path.to_string(),
            line,
            side: "RIGHT".to_string(),
            body,
        }
    }
}

/// Body of `POST /repos/{owner}/{repo}/pulls/{number}/reviews`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub body: String,
    pub event: String,
    pub comments: Vec<ReviewComment>,
}

impl ReviewRequest {
    pub fn comment(body: String, comments: Vec<ReviewComment>) -> Self {
        Self {
            body,
            event: "COMMENT".to_string(),
            comments,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct IssueCommentRequest<'a> {
    pub body: &'a str,
}

/// What GitHub hands back for a created comment or review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedItem {
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}
