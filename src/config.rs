use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("GitHub token not configured; set INPUT_GITHUB_TOKEN, GITHUB_TOKEN, or [github].token")]
    MissingToken,

    #[error("Issue base URL not configured; set INPUT_ISSUE_BASE_URL, ISSUE_BASE_URL, or [jira].issue_base_url")]
    MissingIssueBaseUrl,
}

/// Top-level configuration loaded from .pr-autolink.toml.
///
/// All fields are optional in the file; the two required values may instead
/// come from the environment (the `INPUT_*` names are how a workflow passes
/// action inputs).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub jira: JiraConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to INPUT_GITHUB_TOKEN then
    /// GITHUB_TOKEN.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraConfig {
    /// Base URL issue keys are appended to when building links, e.g.
    /// `https://company.atlassian.net/browse`.
    pub issue_base_url: Option<String>,
}

impl Config {
    const FILE_NAME: &'static str = ".pr-autolink.toml";

    /// Load configuration from .pr-autolink.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(Self::FILE_NAME);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path (useful for testing and --config).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence, then
    /// the workflow input, then the ambient GITHUB_TOKEN.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var("INPUT_GITHUB_TOKEN").ok())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
    }

    /// Resolve the issue base URL with the same precedence as the token.
    pub fn issue_base_url(&self) -> Option<String> {
        self.jira
            .issue_base_url
            .clone()
            .or_else(|| std::env::var("INPUT_ISSUE_BASE_URL").ok())
            .or_else(|| std::env::var("ISSUE_BASE_URL").ok())
    }
}
