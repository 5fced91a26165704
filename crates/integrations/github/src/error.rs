use beacon_core::FetchError;
use thiserror::Error;

/// Errors specific to the GitHub content fetcher.
///
/// These are internal errors that get converted into [`FetchError`] at the
/// public API boundary.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The repository slug is not of the form `owner/repo`.
    #[error("invalid repository {0:?}: expected owner/repo")]
    InvalidRepository(String),

    /// The request URL could not be built.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// The file content could not be decoded.
    #[error("invalid file content: {0}")]
    Decode(String),

    /// The path resolved to something other than a file.
    #[error("path is not a file")]
    NotAFile,
}

impl From<GitHubError> for FetchError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => FetchError::Http(e.to_string()),
            GitHubError::UnexpectedStatus { status, body } => FetchError::Status { status, body },
            GitHubError::Decode(msg) => FetchError::Decode(msg),
            GitHubError::InvalidRepository(_) | GitHubError::InvalidUrl(_) => {
                FetchError::Http(err.to_string())
            }
            GitHubError::NotAFile => FetchError::Unexpected,
        }
    }
}
