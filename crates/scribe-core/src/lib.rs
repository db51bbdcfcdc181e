pub mod alt_text;
pub mod apply;
pub mod config;
pub mod error;
pub mod images;
mod prompts;
mod runner;
pub mod services;
pub mod source;
pub mod telemetry;

pub use alt_text::{AltText, AltTextGenerator, AltTextSource};
pub use apply::{CommentFormat, Suggestion};
pub use config::{HostingConfig, ProviderConfig, ProviderKind, Repository};
pub use error::{ConfigError, HostingError};
pub use images::{AltPolicy, ImageReference};
pub use runner::{RunSummary, Scribe};
pub use services::ai::{build_generator, TextGenerator};
pub use services::github::{GitHubClient, PullRequestHost};
