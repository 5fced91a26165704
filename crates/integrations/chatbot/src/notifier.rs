use beacon_core::ResolvedOptions;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::ChatbotConfig;
use crate::error::ChatbotError;
use crate::request::{self, PreparedRequest};
use crate::types::ResponseEnvelope;

/// Delivers one notification to a DingTalk or Lark bot webhook.
///
/// The request is signed when [`notify`](Self::notify) is called, so the
/// signed timestamp reflects send time rather than construction time.
pub struct ChatbotNotifier {
    options: ResolvedOptions,
    client: Client,
}

impl ChatbotNotifier {
    /// Create a notifier with a client built from `config`.
    pub fn new(options: ResolvedOptions, config: &ChatbotConfig) -> Result<Self, ChatbotError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::default()
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()?;
        Ok(Self { options, client })
    }

    /// Create a notifier with a custom HTTP client.
    ///
    /// Useful for testing or for sharing a connection pool.
    pub fn with_client(options: ResolvedOptions, client: Client) -> Self {
        Self { options, client }
    }

    /// The options this notifier delivers.
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// Build the signed URL and body without sending anything.
    pub fn prepare(&self) -> Result<PreparedRequest, ChatbotError> {
        request::build(&self.options)
    }

    /// Sign, post, and check the provider's answer.
    ///
    /// Returns the serialized response when its application code is `0`.
    /// Any other code, including a missing one, fails with
    /// [`ChatbotError::Rejected`] carrying the serialized response. The HTTP
    /// status is not consulted.
    #[instrument(skip(self), fields(app = %self.options.app))]
    pub async fn notify(&self) -> Result<String, ChatbotError> {
        let prepared = self.prepare()?;
        self.send(&prepared).await
    }

    async fn send(&self, prepared: &PreparedRequest) -> Result<String, ChatbotError> {
        debug!("posting notification");

        let response = self
            .client
            .post(&prepared.url)
            .header("Accept", "application/json")
            .json(&prepared.body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let envelope = ResponseEnvelope::from_text(&text);
        let serialized = envelope.to_json_string();

        if !envelope.is_success() {
            let code = envelope.code();
            warn!(status = status.as_u16(), code, response = %serialized, "notification rejected");
            return Err(ChatbotError::Rejected {
                code,
                response: serialized,
            });
        }

        debug!(status = status.as_u16(), "notification delivered");
        Ok(serialized)
    }
}
