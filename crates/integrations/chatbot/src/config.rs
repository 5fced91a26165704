use std::time::Duration;

/// Transport configuration for the chat-bot notifier.
#[derive(Debug, Clone)]
pub struct ChatbotConfig {
    /// Request timeout.
    pub timeout: Duration,

    /// Whether to follow HTTP redirects.
    pub follow_redirects: bool,
}

impl Default for ChatbotConfig {
    /// 30-second timeout, redirects followed.
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            follow_redirects: true,
        }
    }
}

impl ChatbotConfig {
    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable following HTTP redirects.
    #[must_use]
    pub fn with_no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }
}
