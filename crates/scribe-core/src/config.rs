use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_MAX_TOKENS: u32 = 100;
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_FALLBACK_TEMPLATE: &str = "Image of {filename}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Anthropic,
    OpenAi,
}

impl ProviderKind {
    /// Environment variable holding the provider's API key
    pub fn key_var(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            ProviderKind::OpenAi => DEFAULT_OPENAI_MODEL,
            ProviderKind::Gemini => DEFAULT_GEMINI_MODEL,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

/// Settings for the text generation provider.
///
/// `api_key` is only ever `None` in lenient mode, where every image falls
/// back to the configured fallback text.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(
        kind: ProviderKind,
        api_key: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        base_url: Option<String>,
        lenient: bool,
    ) -> Result<Self, ConfigError> {
        let api_key = non_empty(api_key);
        if api_key.is_none() && !lenient {
            return Err(ConfigError::MissingVar(kind.key_var()));
        }

        Ok(Self {
            kind,
            api_key,
            model: non_empty(model).unwrap_or_else(|| kind.default_model().to_string()),
            max_tokens,
            base_url: non_empty(base_url),
        })
    }
}

/// `owner/name` repository identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once('/') {
            Some((owner, name))
                if !owner.is_empty()
                    && !name.is_empty()
                    && !name.contains('/')
                    && !trimmed.contains(char::is_whitespace) =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Settings for the source-hosting API
#[derive(Debug, Clone)]
pub struct HostingConfig {
    pub token: String,
    pub repository: Repository,
    pub api_url: String,
}

impl HostingConfig {
    pub fn new(
        token: Option<String>,
        repository: Option<String>,
        api_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = non_empty(token).ok_or(ConfigError::MissingVar("GITHUB_TOKEN"))?;
        let repository = non_empty(repository)
            .ok_or(ConfigError::MissingVar("GITHUB_REPOSITORY"))?
            .parse()?;
        let api_url = non_empty(api_url)
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            token,
            repository,
            api_url,
        })
    }
}

/// Parse the pull request number. Absent, non-numeric and `0` are all fatal.
pub fn parse_pull_number(raw: Option<&str>) -> Result<u64, ConfigError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingVar("PR_NUMBER"))?;

    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidPullRequest(raw.to_string())),
        Ok(number) => Ok(number),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
