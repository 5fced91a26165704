use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{JsonDocument, NotifyError};
use crate::fetch::{ContentFetcher, ContentRequest};
use crate::options::{RemoteTemplate, TemplateSource};

/// A resolved notification body. Any JSON value is accepted.
pub type Payload = Value;

/// Placeholder values keyed by placeholder name.
pub type ParamMap = serde_json::Map<String, Value>;

/// Matches `${name}` placeholders; the name is the shortest run up to `}`.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.*?)\}").expect("placeholder regex is valid"));

/// Resolve a template source into a payload.
///
/// Inline templates are parsed as-is. File templates are fetched through
/// `fetcher`, parsed, and have their placeholders substituted.
pub async fn resolve<F: ContentFetcher>(
    source: &TemplateSource,
    fetcher: &F,
) -> Result<Payload, NotifyError> {
    match source {
        TemplateSource::Inline(text) => parse_inline(text),
        TemplateSource::File(remote) => resolve_remote(remote, fetcher).await,
    }
}

/// Parse an inline template. No placeholder substitution is applied.
pub fn parse_inline(text: &str) -> Result<Payload, NotifyError> {
    serde_json::from_str(text).map_err(|e| NotifyError::parse(JsonDocument::Template, e))
}

/// Parse the parameter map. It must be a JSON object.
pub fn parse_params(text: &str) -> Result<ParamMap, NotifyError> {
    match serde_json::from_str(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(NotifyError::parse(
            JsonDocument::Params,
            format!("expected a JSON object, found {}", kind(&other)),
        )),
        Err(e) => Err(NotifyError::parse(JsonDocument::Params, e)),
    }
}

/// Fetch, parse, and fill a repository template.
#[instrument(skip(remote, fetcher), fields(path = %remote.path, branch = %remote.branch))]
pub async fn resolve_remote<F: ContentFetcher>(
    remote: &RemoteTemplate,
    fetcher: &F,
) -> Result<Payload, NotifyError> {
    let params = parse_params(&remote.params)?;

    let request = ContentRequest {
        path: &remote.path,
        reference: &remote.branch,
        token: &remote.github_token,
    };
    let text = fetcher.fetch(&request).await?;
    debug!(bytes = text.len(), "template file fetched");

    let template: Value = serde_json::from_str(&text)
        .map_err(|e| NotifyError::parse(JsonDocument::TemplateFile, e))?;

    Ok(substitute(&template, &params))
}

/// Replace `${name}` placeholders in every string of `template`.
///
/// Returns a new tree; `template` is left untouched. Placeholders with no
/// entry in `params` are kept verbatim. Object keys and array order are
/// preserved, and non-string scalars pass through unchanged.
#[must_use]
pub fn substitute(template: &Value, params: &ParamMap) -> Value {
    match template {
        Value::String(s) => Value::String(substitute_str(s, params).into_owned()),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute(v, params)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute(v, params)))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => template.clone(),
    }
}

fn substitute_str<'a>(s: &'a str, params: &ParamMap) -> Cow<'a, str> {
    PLACEHOLDER_RE.replace_all(s, |caps: &Captures<'_>| match params.get(&caps[1]) {
        Some(value) => param_to_string(value),
        None => caps[0].to_owned(),
    })
}

/// Render a parameter value the way it should appear inside a string.
///
/// Arrays are flattened and joined with `,` (a `null` element renders
/// empty); objects render as `[object Object]`.
fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            // Integral floats print without a fractional part: 3.0 -> "3".
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::Null | Value::Bool(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => param_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
