use serde_json::Value;

/// Envelope fields that may carry the application status code, in lookup
/// order. DingTalk answers with `errcode`; Lark with `code` or the older
/// `StatusCode`.
pub const CODE_FIELDS: [&str; 3] = ["code", "StatusCode", "errcode"];

/// Code reported when no code field is present.
pub const MISSING_CODE: i64 = -1;

/// A provider's reply to a webhook post.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    body: Value,
}

impl ResponseEnvelope {
    /// Wrap an already parsed response body.
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Parse a raw response body. Text that is not JSON is kept as a JSON
    /// string.
    pub fn from_text(text: &str) -> Self {
        let body = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()));
        Self { body }
    }

    /// The parsed body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The application status code.
    ///
    /// The first of [`CODE_FIELDS`] that is present and not `null` decides;
    /// a zero in an earlier field is honoured over a later field. A field
    /// holding something other than an integral number, or no field at all,
    /// yields [`MISSING_CODE`].
    pub fn code(&self) -> i64 {
        CODE_FIELDS
            .iter()
            .find_map(|field| self.body.get(field).filter(|value| !value.is_null()))
            .and_then(numeric_code)
            .unwrap_or(MISSING_CODE)
    }

    /// Returns `true` when the code is exactly zero.
    pub fn is_success(&self) -> bool {
        self.code() == 0
    }

    /// Compact JSON rendering of the body.
    pub fn to_json_string(&self) -> String {
        self.body.to_string()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn numeric_code(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}
