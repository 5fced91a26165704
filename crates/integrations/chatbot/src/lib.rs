//! DingTalk and Lark chat-bot delivery for Beacon.
//!
//! Given [`ResolvedOptions`](beacon_core::ResolvedOptions), this crate signs
//! the request the way each provider expects, posts it, and decides success
//! from the application code in the provider's response envelope.
//!
//! | Provider | Signature goes in | Timestamp |
//! |---|---|---|
//! | DingTalk | URL query (`&timestamp=..&sign=..`) | milliseconds |
//! | Lark | JSON body (`timestamp`, `sign` fields) | seconds |
//!
//! # Quick start
//!
//! ```rust,no_run
//! use beacon_chatbot::{ChatbotConfig, ChatbotNotifier};
//! use beacon_core::ActionOptions;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let template = r#"{"msgtype":"text","text":{"content":"deployed"}}"#;
//! let options = ActionOptions::new(
//!     "dingtalk",
//!     "https://oapi.dingtalk.com/robot/send?access_token=abc",
//!     template,
//! )
//! .with_secret("SEC123")
//! .validate()?
//! .with_payload(beacon_core::template::parse_inline(template)?);
//!
//! let notifier = ChatbotNotifier::new(options, &ChatbotConfig::default())?;
//! let response = notifier.notify().await?;
//! println!("{response}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod notifier;
pub mod request;
pub mod signer;
pub mod types;

pub use config::ChatbotConfig;
pub use error::ChatbotError;
pub use notifier::ChatbotNotifier;
pub use request::PreparedRequest;
pub use signer::SignaturePair;
pub use types::ResponseEnvelope;
