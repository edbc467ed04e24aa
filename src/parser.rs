//! Pulls the JSON payload out of raw model text. The first ```` ```json ````
//! block wins when present; otherwise the whole text is parsed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\n([\s\S]*?)\n```").expect("fence regex is valid"));

/// Extract and deserialize a JSON payload from raw model output.
///
/// The payload may be wrapped in a ```` ```json ```` fenced block; when no
/// fence is found the whole text is used. Returns `None` on any
/// deserialization failure, after logging the error and the raw text.
pub fn parse_json_response<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let body = JSON_FENCE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    match serde_json::from_str(body.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, raw, "Failed to parse JSON response");
            None
        }
    }
}
