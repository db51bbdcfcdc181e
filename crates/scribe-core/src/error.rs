//! Error types for alt-scribe

use thiserror::Error;

/// Configuration problems detected before any network call is made
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable / flag is absent
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    /// Repository identifier is not of the form `owner/name`
    #[error("invalid repository identifier `{0}`, expected `owner/name`")]
    InvalidRepository(String),

    /// Pull request number is not a positive integer
    #[error("invalid pull request number `{0}`")]
    InvalidPullRequest(String),

    /// Unknown text generation provider
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// Failures talking to the source-hosting API. These abort the run.
#[derive(Error, Debug)]
pub enum HostingError {
    /// The API answered with a non-success status
    #[error("GitHub API request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Transport or decoding error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
