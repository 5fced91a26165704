//! Core types for the Beacon chat-bot notifier.
//!
//! A notification run is a single, stateless pipeline:
//!
//! 1. [`ActionOptions`] (raw inputs) are validated into [`ValidatedOptions`].
//! 2. The [`TemplateSource`] is resolved into a JSON payload, either by parsing
//!    an inline document or by fetching a remote template through a
//!    [`ContentFetcher`] and substituting `${name}` placeholders.
//! 3. The resulting [`ResolvedOptions`] are handed to a provider integration
//!    which signs and delivers the request.
//!
//! # Quick start
//!
//! ```rust
//! use beacon_core::{ActionOptions, App, TemplateSource};
//!
//! let validated = ActionOptions::new("lark", "https://example.test/hook", r#"{"msg":"hi"}"#)
//!     .with_secret("s3cret")
//!     .validate()
//!     .unwrap();
//! assert_eq!(validated.app, App::Lark);
//! assert!(matches!(validated.template, TemplateSource::Inline(_)));
//! ```

pub mod app;
pub mod error;
pub mod fetch;
pub mod options;
pub mod template;

pub use app::{App, AppProfile, KeyMaterial, SignaturePlacement, TimeUnit};
pub use error::{JsonDocument, NotifyError};
pub use fetch::{ContentFetcher, ContentRequest, FetchError};
pub use options::{
    ActionOptions, DEFAULT_BRANCH, FILE_URI_PREFIX, RemoteTemplate, ResolvedOptions,
    TemplateSource, ValidatedOptions, is_valid_webhook,
};
pub use template::{ParamMap, Payload, substitute};
