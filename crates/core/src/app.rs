use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// A supported chat-bot webhook backend.
///
/// The set is closed: every provider-specific rule (where the signature goes,
/// which clock resolution is used, how the HMAC is keyed) hangs off
/// [`App::profile`] so call sites never branch on the variant themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum App {
    /// DingTalk custom robot.
    Dingtalk,
    /// Lark / Feishu custom bot.
    Lark,
}

impl App {
    /// All known providers, in the order they are reported to users.
    pub const ALL: [App; 2] = [App::Dingtalk, App::Lark];

    /// Returns the input name of the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dingtalk => "dingtalk",
            Self::Lark => "lark",
        }
    }

    /// Returns the signing strategy for this provider.
    pub fn profile(self) -> &'static AppProfile {
        match self {
            Self::Dingtalk => &DINGTALK_PROFILE,
            Self::Lark => &LARK_PROFILE,
        }
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for App {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|app| app.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|app| app.as_str()).collect();
                NotifyError::Config(format!(
                    "Parameter app must be one of \"{}\"",
                    names.join(", ")
                ))
            })
    }
}

/// Where the signature pair travels in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignaturePlacement {
    /// Appended to the webhook URL as `&timestamp=..&sign=..`.
    Query,
    /// Prepended to the JSON body as `timestamp` and `sign` fields.
    Body,
}

/// Clock resolution of the signed timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    /// Converts an instant into an epoch timestamp in this unit (floored).
    pub fn timestamp(self, at: DateTime<Utc>) -> i64 {
        match self {
            Self::Milliseconds => at.timestamp_millis(),
            Self::Seconds => at.timestamp(),
        }
    }
}

/// How the shared secret enters the HMAC-SHA256 computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMaterial {
    /// Key is the secret; message is `"<timestamp>\n<secret>"`.
    Secret,
    /// Key is `"<timestamp>\n<secret>"`; message is empty.
    TimestampAndSecret,
}

/// Per-provider signing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppProfile {
    pub placement: SignaturePlacement,
    pub time_unit: TimeUnit,
    pub key_material: KeyMaterial,
    /// Whether the base64 signature is additionally percent-encoded.
    pub percent_encode_signature: bool,
}

static DINGTALK_PROFILE: AppProfile = AppProfile {
    placement: SignaturePlacement::Query,
    time_unit: TimeUnit::Milliseconds,
    key_material: KeyMaterial::Secret,
    percent_encode_signature: true,
};

static LARK_PROFILE: AppProfile = AppProfile {
    placement: SignaturePlacement::Body,
    time_unit: TimeUnit::Seconds,
    key_material: KeyMaterial::TimestampAndSecret,
    percent_encode_signature: false,
};
