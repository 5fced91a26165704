use std::fmt;

use thiserror::Error;

/// A request for a single file from the repository that hosts the templates.
#[derive(Clone, Copy)]
pub struct ContentRequest<'a> {
    /// Repository-relative path, without the `file://` prefix.
    pub path: &'a str,
    /// Branch, tag, or commit to read from.
    pub reference: &'a str,
    /// Credential used to authenticate against the repository host.
    pub token: &'a str,
}

impl fmt::Debug for ContentRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRequest")
            .field("path", &self.path)
            .field("reference", &self.reference)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Errors produced by a [`ContentFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// A network or transport-level error occurred.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The repository host answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The file content could not be decoded into UTF-8 text.
    #[error("invalid file content: {0}")]
    Decode(String),

    /// The host answered, but not with file content.
    #[error("Something is wrong when getting file content from repository")]
    Unexpected,
}

/// Retrieves template files from a remote repository.
///
/// Implementations return the decoded text of the file. Failures are
/// propagated to the caller unchanged.
pub trait ContentFetcher: Send + Sync {
    /// Fetch the file described by `request` and return its text.
    fn fetch(
        &self,
        request: &ContentRequest<'_>,
    ) -> impl std::future::Future<Output = Result<String, FetchError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_debug_redacts_token() {
        let request = ContentRequest {
            path: "templates/deploy.json",
            reference: "main",
            token: "ghp-test-placeholder",
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("templates/deploy.json"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("ghp-test-placeholder"));
    }

    #[test]
    fn error_display() {
        let err = FetchError::Status {
            status: 404,
            body: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "unexpected status 404: Not Found");

        let err = FetchError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }
}
