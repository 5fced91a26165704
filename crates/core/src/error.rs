use thiserror::Error;

use crate::fetch::FetchError;

/// The JSON document that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonDocument {
    /// The caller-supplied parameter map.
    Params,
    /// A template fetched from the repository.
    TemplateFile,
    /// An inline template given directly as input.
    Template,
}

impl JsonDocument {
    fn requirement(self) -> &'static str {
        match self {
            Self::Params => "Parameter params must be a valid JSON object",
            Self::TemplateFile => "Template file must contain valid JSON",
            Self::Template => "Parameter template must be a JSON object",
        }
    }
}

/// Errors raised while turning raw inputs into a resolved payload.
///
/// Every variant is fatal for the run; nothing here is retried.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// An input failed validation.
    #[error("{0}")]
    Config(String),

    /// A JSON document could not be parsed.
    #[error("{}. JSON parse error: {detail}", .document.requirement())]
    Parse {
        document: JsonDocument,
        detail: String,
    },

    /// The remote template could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl NotifyError {
    pub(crate) fn parse(document: JsonDocument, detail: impl ToString) -> Self {
        Self::Parse {
            document,
            detail: detail.to_string(),
        }
    }
}
