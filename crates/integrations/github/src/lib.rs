//! GitHub content fetcher for Beacon.
//!
//! Implements [`ContentFetcher`](beacon_core::ContentFetcher) on top of the
//! [repository contents API](https://docs.github.com/en/rest/repos/contents),
//! so `file://` templates can be read from the repository that triggered the
//! notification.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use beacon_github::{GitHubConfig, GitHubContentFetcher};
//!
//! let config = GitHubConfig::from_repository("acme/site")
//!     .unwrap()
//!     .with_timeout_secs(10);
//! let fetcher = GitHubContentFetcher::new(config).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod types;

pub use config::GitHubConfig;
pub use error::GitHubError;
pub use fetcher::GitHubContentFetcher;
pub use types::ContentResponse;
