mod types;

pub use types::*;

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};

use crate::config::{HostingConfig, Repository};
use crate::error::HostingError;

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("alt-scribe/", env!("CARGO_PKG_VERSION"));

/// Pull request operations of the source-hosting API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestHost: Send + Sync + Debug {
    async fn list_files(&self, number: u64) -> Result<Vec<PullRequestFile>, HostingError>;
    async fn post_issue_comment(&self, number: u64, body: &str)
        -> Result<PostedItem, HostingError>;
    async fn create_review(
        &self,
        number: u64,
        review: &ReviewRequest,
    ) -> Result<PostedItem, HostingError>;
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    token: String,
    repository: Repository,
    api_url: String,
}

impl GitHubClient {
    pub fn new(config: &HostingConfig) -> Result<Self, HostingError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            token: config.token.clone(),
            repository: config.repository.clone(),
            api_url: config.api_url.clone(),
        })
    }

    fn repo_url(&self, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.repository.owner, self.repository.name, tail
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn check(response: Response) -> Result<Response, HostingError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(HostingError::Status {
            url,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PullRequestHost for GitHubClient {
    async fn list_files(&self, number: u64) -> Result<Vec<PullRequestFile>, HostingError> {
        let mut files = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}?per_page={}&page={}",
                self.repo_url(&format!("pulls/{}/files", number)),
                PER_PAGE,
                page
            );
            let response = self.request(Method::GET, &url).send().await?;
            let batch: Vec<PullRequestFile> = Self::check(response).await?.json().await?;

            tracing::debug!("page {} listed {} files", page, batch.len());
            let done = batch.len() < PER_PAGE;
            files.extend(batch);
            if done {
                break;
            }
            page += 1;
        }

        Ok(files)
    }

    async fn post_issue_comment(
        &self,
        number: u64,
        body: &str,
    ) -> Result<PostedItem, HostingError> {
        let url = self.repo_url(&format!("issues/{}/comments", number));
        let response = self
            .request(Method::POST, &url)
            .json(&IssueCommentRequest { body })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_review(
        &self,
        number: u64,
        review: &ReviewRequest,
    ) -> Result<PostedItem, HostingError> {
        let url = self.repo_url(&format!("pulls/{}/reviews", number));
        let response = self
            .request(Method::POST, &url)
            .json(review)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> GitHubClient {
        let config = HostingConfig::new(
            Some("token".to_string()),
            Some("octo/docs".to_string()),
            None,
        )
        .unwrap();
        GitHubClient::new(&config).unwrap()
    }

    #[test]
    fn test_repo_url() {
        assert_eq!(
            client().repo_url("pulls/7/files"),
            "https://api.github.com/repos/octo/docs/pulls/7/files"
        );
    }

    #[test]
    fn test_pull_request_file_deserialize() {
        let files: Vec<PullRequestFile> = serde_json::from_str(
            r#"[
                {"filename":"docs/a.md","status":"modified","patch":"@@ -1 +1 @@\n-x\n+y"},
                {"filename":"logo.png","status":"added"},
                {"filename":"old.md","status":"removed","patch":"@@ -1 +0,0 @@\n-gone"}
            ]"#,
        )
        .unwrap();

        assert_eq!(files.len(), 3);
        assert_eq!(files[0].patch.as_deref(), Some("@@ -1 +1 @@\n-x\n+y"));
        assert!(files[1].patch.is_none());
        assert!(files[2].is_removed());
    }

    #[test]
    fn test_review_request_serialize() {
        let review = ReviewRequest::comment(
            "Suggested alt text".to_string(),
            vec![ReviewComment::on_new_line("docs/a.md", 3, "fix".to_string())],
        );
        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "body": "Suggested alt text",
                "event": "COMMENT",
                "comments": [
                    {"path": "docs/a.md", "line": 3, "side": "RIGHT", "body": "fix"}
                ]
            })
        );
    }
}
