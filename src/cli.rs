use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use scribe_core::config::{
    parse_pull_number, HostingConfig, ProviderConfig, ProviderKind, DEFAULT_FALLBACK_TEMPLATE,
};
use scribe_core::{AltPolicy, CommentFormat, ConfigError};

#[derive(Parser, Debug)]
#[command(name = "alt-scribe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Suggest alt text for markdown images that have none", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub provider: ProviderArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill in missing alt text in every markdown file under a directory
    Rewrite {
        /// Directory to scan
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Print the changes as a unified diff instead of writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Post one comment listing suggestions for a pull request
    Comment {
        #[command(flatten)]
        pull_request: PullRequestArgs,

        /// Layout of the comment body
        #[arg(long, value_enum, default_value_t = CommentStyle::Diff)]
        format: CommentStyle,
    },

    /// Post a review with a suggestion on each affected line
    Review {
        #[command(flatten)]
        pull_request: PullRequestArgs,
    },
}

#[derive(Args, Debug)]
pub struct ProviderArgs {
    /// Text generation provider (gemini, anthropic or openai)
    #[arg(long, global = true, default_value = "gemini")]
    pub provider: ProviderKind,

    /// Model name (defaults per provider)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Completion token limit
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// Alt text used when generation fails; `{filename}` and `{path}` are expanded
    #[arg(long, global = true, default_value = DEFAULT_FALLBACK_TEMPLATE)]
    pub fallback: String,

    /// Skip images whose generation fails instead of using the fallback
    #[arg(long, global = true)]
    pub no_fallback: bool,

    /// Run without an API key, using the fallback for every image
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Maximum number of generation requests in flight
    #[arg(long, global = true, default_value_t = 1)]
    pub concurrency: usize,

    /// Document extensions to scan (comma separated)
    #[arg(long = "ext", global = true, value_delimiter = ',')]
    pub extensions: Vec<String>,

    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, global = true, env = "GEMINI_BASE_URL")]
    pub gemini_base_url: Option<String>,

    #[arg(long, global = true, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    #[arg(long, global = true, env = "ANTHROPIC_BASE_URL")]
    pub anthropic_base_url: Option<String>,

    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,
}

impl ProviderArgs {
    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        let (api_key, base_url) = match self.provider {
            ProviderKind::Gemini => (&self.gemini_api_key, &self.gemini_base_url),
            ProviderKind::Anthropic => (&self.anthropic_api_key, &self.anthropic_base_url),
            ProviderKind::OpenAi => (&self.openai_api_key, &self.openai_base_url),
        };

        ProviderConfig::new(
            self.provider,
            api_key.clone(),
            self.model.clone(),
            self.max_tokens,
            base_url.clone(),
            self.lenient,
        )
    }

    pub fn fallback(&self) -> Option<String> {
        if self.no_fallback {
            None
        } else {
            Some(self.fallback.clone())
        }
    }
}

#[derive(Args, Debug)]
pub struct PullRequestArgs {
    /// Pull request number
    #[arg(long = "pr", env = "PR_NUMBER")]
    pub number: Option<String>,

    /// Repository as `owner/name`
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Suggest alt text for every added image, not only those without any
    #[arg(long)]
    pub all_images: bool,
}

impl PullRequestArgs {
    pub fn number(&self) -> Result<u64, ConfigError> {
        parse_pull_number(self.number.as_deref())
    }

    pub fn hosting_config(&self) -> Result<HostingConfig, ConfigError> {
        HostingConfig::new(self.token.clone(), self.repo.clone(), self.api_url.clone())
    }

    pub fn policy(&self) -> AltPolicy {
        if self.all_images {
            AltPolicy::All
        } else {
            AltPolicy::MissingOnly
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Diff,
    List,
}

impl From<CommentStyle> for CommentFormat {
    fn from(style: CommentStyle) -> Self {
        match style {
            CommentStyle::Diff => CommentFormat::Diff,
            CommentStyle::List => CommentFormat::List,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_rewrite_defaults() {
        let cli = parse(&["alt-scribe", "rewrite"]);
        match cli.command {
            Commands::Rewrite { root, dry_run } => {
                assert_eq!(root, PathBuf::from("."));
                assert!(!dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.provider.provider, ProviderKind::Gemini);
        assert_eq!(cli.provider.concurrency, 1);
        assert_eq!(
            cli.provider.fallback().as_deref(),
            Some(DEFAULT_FALLBACK_TEMPLATE)
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&[
            "alt-scribe",
            "rewrite",
            "docs",
            "--dry-run",
            "--provider",
            "openai",
            "--no-fallback",
            "--ext",
            "md,markdown",
            "--concurrency",
            "4",
            "--verbose",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.provider.provider, ProviderKind::OpenAi);
        assert_eq!(cli.provider.fallback(), None);
        assert_eq!(cli.provider.extensions, vec!["md", "markdown"]);
        assert_eq!(cli.provider.concurrency, 4);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(Cli::try_parse_from(["alt-scribe", "--provider", "bard", "rewrite"]).is_err());
    }

    #[test]
    fn test_comment_args() {
        let cli = parse(&[
            "alt-scribe",
            "comment",
            "--pr",
            "42",
            "--repo",
            "octo/docs",
            "--token",
            "ghp_test",
            "--format",
            "list",
            "--all-images",
        ]);
        match cli.command {
            Commands::Comment {
                pull_request,
                format,
            } => {
                assert_eq!(pull_request.number(), Ok(42));
                assert_eq!(pull_request.policy(), AltPolicy::All);
                assert_eq!(CommentFormat::from(format), CommentFormat::List);

                let hosting = pull_request.hosting_config().unwrap();
                assert_eq!(hosting.repository.to_string(), "octo/docs");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_lenient_provider_config() {
        let mut cli = parse(&["alt-scribe", "--lenient", "review"]);
        cli.provider.gemini_api_key = None;

        let config = cli.provider.provider_config().unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, ProviderKind::Gemini.default_model());
    }

    #[test]
    fn test_gemini_provider_config() {
        let cli = parse(&[
            "alt-scribe",
            "rewrite",
            "--gemini-api-key",
            "g-test",
            "--gemini-base-url",
            "http://localhost:9000",
        ]);

        let config = cli.provider.provider_config().unwrap();
        assert_eq!(config.kind, ProviderKind::Gemini);
        assert_eq!(config.api_key.as_deref(), Some("g-test"));
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let mut cli = parse(&["alt-scribe", "--provider", "openai", "review"]);
        cli.provider.openai_api_key = None;

        assert_eq!(
            cli.provider.provider_config().unwrap_err(),
            ConfigError::MissingVar("OPENAI_API_KEY")
        );
    }
}
