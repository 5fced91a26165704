use beacon_core::{ContentFetcher, ContentRequest, FetchError};
use reqwest::{Client, Url};
use tracing::{debug, instrument, warn};

use crate::config::GitHubConfig;
use crate::error::GitHubError;
use crate::types::ContentResponse;

/// Reads template files through the GitHub repository-contents API.
pub struct GitHubContentFetcher {
    config: GitHubConfig,
    client: Client,
}

impl GitHubContentFetcher {
    /// Create a fetcher with a client built from the configuration.
    pub fn new(config: GitHubConfig) -> Result<Self, GitHubError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { config, client })
    }

    /// Create a fetcher with a custom HTTP client.
    ///
    /// The client is expected to send a `User-Agent` header.
    pub fn with_client(config: GitHubConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Build `{base}/repos/{owner}/{repo}/contents/{path}?ref={reference}`.
    fn contents_url(&self, path: &str, reference: &str) -> Result<Url, GitHubError> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| GitHubError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| GitHubError::InvalidUrl(self.config.api_base_url.clone()))?
            .pop_if_empty()
            .extend([
                "repos",
                self.config.owner.as_str(),
                self.config.repo.as_str(),
                "contents",
            ])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        url.query_pairs_mut().append_pair("ref", reference);
        Ok(url)
    }

    async fn get_content(&self, request: &ContentRequest<'_>) -> Result<String, GitHubError> {
        let url = self.contents_url(request.path, request.reference)?;

        debug!(%url, "fetching template from repository");

        let response = self
            .client
            .get(url)
            .bearer_auth(request.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "repository contents request failed");
            return Err(GitHubError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let content: ContentResponse =
            serde_json::from_str(&body).map_err(|_| GitHubError::NotAFile)?;
        content.decode()
    }
}

impl ContentFetcher for GitHubContentFetcher {
    #[instrument(skip(self, request), fields(path = %request.path, reference = %request.reference))]
    async fn fetch(&self, request: &ContentRequest<'_>) -> Result<String, FetchError> {
        Ok(self.get_content(request).await?)
    }
}
