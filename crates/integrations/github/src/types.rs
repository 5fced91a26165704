use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::Deserialize;

use crate::error::GitHubError;

/// The subset of a repository-contents response Beacon reads.
///
/// Directory listings are JSON arrays and do not deserialize into this type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentResponse {
    /// File type reported by the API (`file`, `dir`, `symlink`, `submodule`).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Encoded file body.
    #[serde(default)]
    pub content: Option<String>,

    /// Encoding of `content`, normally `base64`.
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ContentResponse {
    /// Decode the file body into UTF-8 text.
    ///
    /// The API wraps base64 content at 60 columns, so whitespace is removed
    /// before decoding.
    pub fn decode(&self) -> Result<String, GitHubError> {
        if self.kind.as_deref().is_some_and(|kind| kind != "file") {
            return Err(GitHubError::NotAFile);
        }
        let content = self.content.as_deref().ok_or(GitHubError::NotAFile)?;
        if let Some(encoding) = self.encoding.as_deref()
            && encoding != "base64"
        {
            return Err(GitHubError::Decode(format!(
                "unsupported content encoding {encoding:?}"
            )));
        }

        let compact: String = content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = B64
            .decode(compact)
            .map_err(|e| GitHubError::Decode(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| GitHubError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wrapped_base64() {
        let response = ContentResponse {
            kind: Some("file".into()),
            content: Some("eyJhIjog\nIiR7eH0ifQ==\n".into()),
            encoding: Some("base64".into()),
        };
        assert_eq!(response.decode().unwrap(), r#"{"a": "${x}"}"#);
    }

    #[test]
    fn missing_content_is_not_a_file() {
        let response = ContentResponse {
            kind: Some("submodule".into()),
            ..ContentResponse::default()
        };
        assert!(matches!(response.decode(), Err(GitHubError::NotAFile)));
    }

    #[test]
    fn non_file_kind_is_not_a_file() {
        let response = ContentResponse {
            kind: Some("symlink".into()),
            content: Some("e30=".into()),
            encoding: Some("base64".into()),
        };
        assert!(matches!(response.decode(), Err(GitHubError::NotAFile)));
    }

    #[test]
    fn rejects_unknown_encoding() {
        let response = ContentResponse {
            kind: Some("file".into()),
            content: Some(String::new()),
            encoding: Some("none".into()),
        };
        assert!(matches!(response.decode(), Err(GitHubError::Decode(_))));
    }

    #[test]
    fn rejects_invalid_base64() {
        let response = ContentResponse {
            content: Some("!!!".into()),
            ..ContentResponse::default()
        };
        assert!(matches!(response.decode(), Err(GitHubError::Decode(_))));
    }

    #[test]
    fn deserializes_api_shape() {
        let response: ContentResponse = serde_json::from_str(
            r#"{"type":"file","name":"t.json","path":"t.json","content":"e30=\n","encoding":"base64"}"#,
        )
        .unwrap();
        assert_eq!(response.kind.as_deref(), Some("file"));
        assert_eq!(response.decode().unwrap(), "{}");
    }
}
