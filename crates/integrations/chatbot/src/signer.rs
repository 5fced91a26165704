use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use beacon_core::{App, KeyMaterial};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::Sha256;

use crate::error::ChatbotError;

type HmacSha256 = Hmac<Sha256>;

/// Characters left alone when percent-encoding a URI component.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` for use as a URI component.
pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// A signature and the timestamp it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePair {
    pub sign: String,
    pub timestamp: String,
}

/// Sign for `app` using the current time.
pub fn sign(app: App, secret: &str) -> Result<SignaturePair, ChatbotError> {
    sign_at(app, secret, Utc::now())
}

/// Sign for `app` as of `at`.
///
/// DingTalk keys the HMAC with the secret over `"<ms>\n<secret>"` and
/// percent-encodes the base64 digest. Lark keys the HMAC with
/// `"<s>\n<secret>"` over an empty message and leaves the digest as base64.
pub fn sign_at(app: App, secret: &str, at: DateTime<Utc>) -> Result<SignaturePair, ChatbotError> {
    let profile = app.profile();
    let timestamp = profile.time_unit.timestamp(at).to_string();
    let string_to_sign = format!("{timestamp}\n{secret}");

    let (key, message) = match profile.key_material {
        KeyMaterial::Secret => (secret.as_bytes(), string_to_sign.as_bytes()),
        KeyMaterial::TimestampAndSecret => (string_to_sign.as_bytes(), &[][..]),
    };
    let digest = B64.encode(compute_hmac(key, message)?);

    let sign = if profile.percent_encode_signature {
        encode_component(&digest)
    } else {
        digest
    };
    Ok(SignaturePair { sign, timestamp })
}

fn compute_hmac(key: &[u8], message: &[u8]) -> Result<Vec<u8>, ChatbotError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ChatbotError::SigningError(format!("invalid HMAC key: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
