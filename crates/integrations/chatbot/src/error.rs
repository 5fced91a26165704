use thiserror::Error;

/// Errors raised while signing or delivering a notification.
#[derive(Debug, Error)]
pub enum ChatbotError {
    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-zero application code.
    ///
    /// The message is the serialized response so callers can inspect the
    /// provider's own diagnostics.
    #[error("{response}")]
    Rejected { code: i64, response: String },

    /// The payload cannot carry the provider's signature.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// HMAC signature computation failed.
    #[error("HMAC signing error: {0}")]
    SigningError(String),
}

impl ChatbotError {
    /// Returns the application code for a rejected request.
    pub fn rejection_code(&self) -> Option<i64> {
        match self {
            Self::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }
}
