use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::app::App;
use crate::error::NotifyError;
use crate::fetch::ContentFetcher;
use crate::template::{self, Payload};

/// Prefix marking a template as a repository file reference.
pub const FILE_URI_PREFIX: &str = "file://";

/// Revision used for file templates when no branch is given.
pub const DEFAULT_BRANCH: &str = "main";

/// Shape check for webhook URLs: a scheme, then a plausible host start, then
/// no whitespace until the end.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("webhook URL regex is valid")
});

/// Returns `true` if `webhook` looks like an `http(s)` URL.
#[must_use]
pub fn is_valid_webhook(webhook: &str) -> bool {
    URL_RE.is_match(webhook)
}

/// Raw invocation inputs, exactly as received from flags or the environment.
///
/// Optional inputs that arrive as empty strings are treated as absent.
#[derive(Clone, Default)]
pub struct ActionOptions {
    /// Provider name, one of [`App::ALL`].
    pub app: String,
    /// Bot webhook URL.
    pub webhook: String,
    /// Shared signing secret.
    pub secret: Option<String>,
    /// Inline JSON, or `file://<path>` pointing into the repository.
    pub template: String,
    /// JSON object with placeholder values for file templates.
    pub params: Option<String>,
    /// Token used to read file templates from the repository.
    pub github_token: Option<String>,
    /// Revision used to read file templates.
    pub branch: Option<String>,
}

impl fmt::Debug for ActionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionOptions")
            .field("app", &self.app)
            .field("webhook", &"[REDACTED]")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("template", &self.template)
            .field("params", &self.params)
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field("branch", &self.branch)
            .finish()
    }
}

impl ActionOptions {
    /// Create options from the three required inputs.
    pub fn new(
        app: impl Into<String>,
        webhook: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            app: app.into(),
            webhook: webhook.into(),
            template: template.into(),
            ..Self::default()
        }
    }

    /// Set the shared signing secret.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set the placeholder parameters (a JSON object string).
    #[must_use]
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Set the repository access token.
    #[must_use]
    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    /// Set the revision to read file templates from.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Validate the inputs.
    ///
    /// Checks run in order and the first failure is returned: provider name,
    /// webhook shape, then the companions a file template needs. No I/O is
    /// performed.
    pub fn validate(self) -> Result<ValidatedOptions, NotifyError> {
        let app: App = self.app.parse()?;

        if !is_valid_webhook(&self.webhook) {
            return Err(NotifyError::Config(
                "Parameter webhook must be a URL".to_owned(),
            ));
        }

        let secret = non_empty(self.secret).unwrap_or_default();

        let template = match self.template.strip_prefix(FILE_URI_PREFIX) {
            Some(path) => {
                let (Some(params), Some(github_token)) =
                    (non_empty(self.params), non_empty(self.github_token))
                else {
                    return Err(NotifyError::Config(
                        "Parameter params and parameter githubToken is required when template is a file URI"
                            .to_owned(),
                    ));
                };
                TemplateSource::File(RemoteTemplate {
                    path: path.to_owned(),
                    params,
                    github_token,
                    branch: non_empty(self.branch).unwrap_or_else(|| DEFAULT_BRANCH.to_owned()),
                })
            }
            None => TemplateSource::Inline(self.template),
        };

        debug!(%app, file_template = template.is_file(), "options validated");

        Ok(ValidatedOptions {
            app,
            webhook: self.webhook,
            secret,
            template,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Where the notification payload comes from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// A JSON document given directly. Placeholders are not substituted.
    Inline(String),
    /// A JSON document read from the repository and filled from parameters.
    File(RemoteTemplate),
}

impl TemplateSource {
    /// Returns `true` for repository file templates.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

/// A template stored in the repository, plus everything needed to fill it.
#[derive(Clone)]
pub struct RemoteTemplate {
    /// Repository-relative path (prefix stripped).
    pub path: String,
    /// Raw parameter map JSON.
    pub params: String,
    /// Repository access token.
    pub github_token: String,
    /// Revision to read from.
    pub branch: String,
}

impl fmt::Debug for RemoteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTemplate")
            .field("path", &self.path)
            .field("params", &self.params)
            .field("github_token", &"[REDACTED]")
            .field("branch", &self.branch)
            .finish()
    }
}

/// Inputs that passed validation but whose template is not resolved yet.
#[derive(Clone)]
pub struct ValidatedOptions {
    pub app: App,
    pub webhook: String,
    /// Shared secret; empty when signing is disabled.
    pub secret: String,
    pub template: TemplateSource,
}

impl fmt::Debug for ValidatedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedOptions")
            .field("app", &self.app)
            .field("webhook", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .field("template", &self.template)
            .finish()
    }
}

impl ValidatedOptions {
    /// Resolve the template and produce the final options.
    ///
    /// `fetcher` is only consulted for [`TemplateSource::File`].
    pub async fn resolve<F: ContentFetcher>(
        self,
        fetcher: &F,
    ) -> Result<ResolvedOptions, NotifyError> {
        let payload = template::resolve(&self.template, fetcher).await?;
        Ok(self.with_payload(payload))
    }

    /// Attach an already resolved payload.
    pub fn with_payload(self, payload: Payload) -> ResolvedOptions {
        ResolvedOptions {
            app: self.app,
            webhook: self.webhook,
            secret: self.secret,
            payload,
        }
    }
}

/// Fully resolved options: everything a provider needs to deliver the
/// notification.
#[derive(Clone)]
pub struct ResolvedOptions {
    pub app: App,
    pub webhook: String,
    /// Shared secret; empty when signing is disabled.
    pub secret: String,
    pub payload: Payload,
}

impl ResolvedOptions {
    /// Returns `true` when a signature must be attached.
    pub fn signs(&self) -> bool {
        !self.secret.is_empty()
    }
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("app", &self.app)
            .field("webhook", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOOK: &str = "https://example.test/hook?key=1";

    #[test]
    fn accepts_every_known_app() {
        for app in App::ALL {
            let validated = ActionOptions::new(app.as_str(), HOOK, "{}")
                .validate()
                .unwrap();
            assert_eq!(validated.app, app);
        }
    }

    #[test]
    fn rejects_unknown_app_before_anything_else() {
        let err = ActionOptions::new("teams", "not a url", "file://x.json")
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter app must be one of \"dingtalk, lark\""
        );
    }

    #[test]
    fn rejects_bad_webhook_before_file_companions() {
        let err = ActionOptions::new("lark", "not a url", "file://t.json")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Parameter webhook must be a URL");
    }

    #[test]
    fn webhook_shape() {
        for good in [
            "https://oapi.dingtalk.com/robot/send?access_token=abc",
            "http://localhost:8080/hook",
            "https://open.feishu.cn/open-apis/bot/v2/hook/123",
        ] {
            assert!(is_valid_webhook(good), "{good} should be accepted");
        }
        for bad in [
            "",
            "example.com/hook",
            "ftp://example.com",
            "https://",
            "https://exa mple.com",
            "https:///path",
            "https://.example.com",
        ] {
            assert!(!is_valid_webhook(bad), "{bad} should be rejected");
            let err = ActionOptions::new("lark", bad, "{}").validate().unwrap_err();
            assert_eq!(err.to_string(), "Parameter webhook must be a URL");
        }
    }

    #[test]
    fn secret_defaults_to_empty() {
        let validated = ActionOptions::new("dingtalk", HOOK, "{}").validate().unwrap();
        assert_eq!(validated.secret, "");

        let validated = ActionOptions::new("dingtalk", HOOK, "{}")
            .with_secret("")
            .validate()
            .unwrap();
        assert_eq!(validated.secret, "");
    }

    #[test]
    fn inline_template_keeps_text() {
        let validated = ActionOptions::new("lark", HOOK, r#"{"a":"${x}"}"#)
            .validate()
            .unwrap();
        match validated.template {
            TemplateSource::Inline(text) => assert_eq!(text, r#"{"a":"${x}"}"#),
            TemplateSource::File(_) => panic!("expected inline template"),
        }
    }

    #[test]
    fn file_template_requires_params_and_token() {
        let message =
            "Parameter params and parameter githubToken is required when template is a file URI";

        let err = ActionOptions::new("lark", HOOK, "file://t.json")
            .with_github_token("tok")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), message);

        let err = ActionOptions::new("lark", HOOK, "file://t.json")
            .with_params("{}")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), message);

        let err = ActionOptions::new("lark", HOOK, "file://t.json")
            .with_params("")
            .with_github_token("tok")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn file_template_strips_prefix_and_defaults_branch() {
        let validated = ActionOptions::new("dingtalk", HOOK, "file://.github/notify.json")
            .with_params(r#"{"x":1}"#)
            .with_github_token("tok")
            .validate()
            .unwrap();
        let TemplateSource::File(remote) = validated.template else {
            panic!("expected file template");
        };
        assert_eq!(remote.path, ".github/notify.json");
        assert_eq!(remote.branch, DEFAULT_BRANCH);
        assert_eq!(remote.params, r#"{"x":1}"#);
    }

    #[test]
    fn file_template_honours_branch() {
        let validated = ActionOptions::new("dingtalk", HOOK, "file://t.json")
            .with_params("{}")
            .with_github_token("tok")
            .with_branch("release")
            .validate()
            .unwrap();
        let TemplateSource::File(remote) = validated.template else {
            panic!("expected file template");
        };
        assert_eq!(remote.branch, "release");
    }

    #[test]
    fn debug_redacts_credentials() {
        let options = ActionOptions::new("lark", "https://example.test/hook/secret-hook-id", "{}")
            .with_secret("secret-placeholder")
            .with_github_token("token-placeholder");
        let debug = format!("{options:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret-hook-id"));
        assert!(!debug.contains("secret-placeholder"));
        assert!(!debug.contains("token-placeholder"));

        let validated = options.validate().unwrap();
        let debug = format!("{validated:?}");
        assert!(!debug.contains("secret-placeholder"));

        let resolved = validated.with_payload(serde_json::json!({"msg": "hi"}));
        let debug = format!("{resolved:?}");
        assert!(!debug.contains("secret-placeholder"));
        assert!(debug.contains("msg"));
    }

    #[test]
    fn signs_only_with_secret() {
        let resolved = ActionOptions::new("lark", HOOK, "{}")
            .validate()
            .unwrap()
            .with_payload(serde_json::json!({}));
        assert!(!resolved.signs());

        let resolved = ActionOptions::new("lark", HOOK, "{}")
            .with_secret("s")
            .validate()
            .unwrap()
            .with_payload(serde_json::json!({}));
        assert!(resolved.signs());
    }
}
