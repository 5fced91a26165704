use std::time::Duration;

use crate::error::GitHubError;

/// Public GitHub REST API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Configuration for the GitHub content fetcher.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Base URL of the REST API. Override for GitHub Enterprise or for
    /// testing against a mock server.
    pub api_base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// `User-Agent` header; the API rejects requests without one.
    pub user_agent: String,
}

impl GitHubConfig {
    /// Create a configuration for `owner/repo`.
    ///
    /// Defaults to the public API and a 30-second timeout.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("beacon/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }

    /// Create a configuration from an `owner/repo` slug, as found in
    /// `GITHUB_REPOSITORY`.
    pub fn from_repository(slug: &str) -> Result<Self, GitHubError> {
        match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self::new(owner, repo))
            }
            _ => Err(GitHubError::InvalidRepository(slug.to_owned())),
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
