use std::fmt;

use beacon_core::{Payload, ResolvedOptions, SignaturePlacement};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ChatbotError;
use crate::signer::{self, SignaturePair, encode_component};

/// Body fields that carry a Lark signature.
const SIGNATURE_FIELDS: [&str; 2] = ["timestamp", "sign"];

/// The final URL and JSON body of a notification.
#[derive(Clone, PartialEq)]
pub struct PreparedRequest {
    pub url: String,
    pub body: Payload,
}

impl fmt::Debug for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedRequest")
            .field("url", &"[REDACTED]")
            .field("body", &self.body)
            .finish()
    }
}

/// Build the request, signing with the current time.
pub fn build(options: &ResolvedOptions) -> Result<PreparedRequest, ChatbotError> {
    build_at(options, Utc::now())
}

/// Build the request as of `at`.
///
/// Without a secret the webhook and payload are used unchanged. With one,
/// DingTalk gets `&timestamp=..&sign=..` appended to the URL and Lark gets
/// `timestamp` and `sign` placed in front of the payload fields.
pub fn build_at(
    options: &ResolvedOptions,
    at: DateTime<Utc>,
) -> Result<PreparedRequest, ChatbotError> {
    if !options.signs() {
        debug!(app = %options.app, "no secret configured, sending unsigned");
        return Ok(PreparedRequest {
            url: options.webhook.clone(),
            body: options.payload.clone(),
        });
    }

    let pair = signer::sign_at(options.app, &options.secret, at)?;
    debug!(app = %options.app, timestamp = %pair.timestamp, "request signed");

    match options.app.profile().placement {
        SignaturePlacement::Query => Ok(PreparedRequest {
            url: signed_url(&options.webhook, &pair),
            body: options.payload.clone(),
        }),
        SignaturePlacement::Body => Ok(PreparedRequest {
            url: options.webhook.clone(),
            body: signed_body(&options.payload, &pair)?,
        }),
    }
}

fn signed_url(webhook: &str, pair: &SignaturePair) -> String {
    format!(
        "{webhook}&timestamp={}&sign={}",
        encode_component(&pair.timestamp),
        encode_component(&pair.sign)
    )
}

/// `{ timestamp, sign, ...payload }`; the signature fields win on collision.
fn signed_body(payload: &Payload, pair: &SignaturePair) -> Result<Payload, ChatbotError> {
    let Value::Object(fields) = payload else {
        return Err(ChatbotError::InvalidPayload(
            "a signed Lark payload must be a JSON object".into(),
        ));
    };

    let mut body = Map::with_capacity(fields.len() + SIGNATURE_FIELDS.len());
    body.insert("timestamp".to_owned(), Value::String(pair.timestamp.clone()));
    body.insert("sign".to_owned(), Value::String(pair.sign.clone()));
    for (key, value) in fields {
        if SIGNATURE_FIELDS.contains(&key.as_str()) {
            warn!(field = %key, "payload field replaced by signature field");
            continue;
        }
        body.insert(key.clone(), value.clone());
    }
    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use beacon_core::ActionOptions;
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    const HOOK: &str = "https://example.test/hook?key=1";

    fn resolved(app: &str, secret: &str, payload: Value) -> ResolvedOptions {
        ActionOptions::new(app, HOOK, "{}")
            .with_secret(secret)
            .validate()
            .unwrap()
            .with_payload(payload)
    }

    fn at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    #[test]
    fn dingtalk_signs_in_url() {
        let options = resolved("dingtalk", "s", json!({"msg": "hi"}));
        let request = build_at(&options, at()).unwrap();
        assert_eq!(
            request.url,
            "https://example.test/hook?key=1&timestamp=1700000000000&sign=izNUYw3bO0KxsDYzYMDR365t%252BvMgZSe8PyS8sv7esqs%253D"
        );
        assert_eq!(request.body, json!({"msg": "hi"}));
    }

    #[test]
    fn lark_signs_in_body() {
        let options = resolved("lark", "s", json!({"msg": "hi"}));
        let request = build_at(&options, at()).unwrap();
        assert_eq!(request.url, HOOK);
        assert_eq!(
            serde_json::to_string(&request.body).unwrap(),
            r#"{"timestamp":"1700000000","sign":"+z1fiKH1w9xoRwSUZju5W5ZBj/d5cwS4H+5mTClDOl4=","msg":"hi"}"#
        );
    }

    #[test]
    fn unsigned_requests_are_untouched() {
        for app in ["dingtalk", "lark"] {
            let options = resolved(app, "", json!({"msg": "hi"}));
            let request = build_at(&options, at()).unwrap();
            assert_eq!(request.url, HOOK);
            assert_eq!(request.body, json!({"msg": "hi"}));
        }
    }

    #[test]
    fn lark_signature_fields_win_on_collision() {
        let options = resolved(
            "lark",
            "s",
            json!({"sign": "forged", "msg": "hi", "timestamp": "0"}),
        );
        let request = build_at(&options, at()).unwrap();
        let body = request.body.as_object().unwrap();
        assert_eq!(body.len(), 3);
        assert_eq!(body["timestamp"], "1700000000");
        assert_eq!(body["sign"], "+z1fiKH1w9xoRwSUZju5W5ZBj/d5cwS4H+5mTClDOl4=");
        let keys: Vec<&String> = body.keys().collect();
        assert_eq!(keys, ["timestamp", "sign", "msg"]);
    }

    #[test]
    fn lark_rejects_non_object_payload_when_signing() {
        let options = resolved("lark", "s", json!(["not", "an", "object"]));
        let err = build_at(&options, at()).unwrap_err();
        assert!(matches!(err, ChatbotError::InvalidPayload(_)));
    }

    #[test]
    fn dingtalk_accepts_any_payload_shape() {
        let options = resolved("dingtalk", "s", json!("plain"));
        let request = build_at(&options, at()).unwrap();
        assert_eq!(request.body, json!("plain"));
    }

    #[test]
    fn build_uses_current_time() {
        let options = resolved("dingtalk", "s", json!({}));
        let request = build(&options).unwrap();
        let query = request.url.strip_prefix(HOOK).unwrap();
        let timestamp = query
            .strip_prefix("&timestamp=")
            .and_then(|rest| rest.split('&').next())
            .unwrap();
        assert_eq!(timestamp.len(), 13);
        assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn debug_redacts_url() {
        let request = PreparedRequest {
            url: "https://example.test/robot/send?access_token=placeholder-token".into(),
            body: json!({"msg": "hi"}),
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("placeholder-token"));
        assert!(debug.contains("msg"));
    }
}
