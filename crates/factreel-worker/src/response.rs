//! Helpers for decoding JSON out of chat completion content.

use serde::de::DeserializeOwned;

use crate::error::{WorkerError, WorkerResult};

/// Strip a surrounding markdown code fence (```` ```json ... ``` ````).
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Parse chat content as JSON into `T`.
///
/// `what` names the expected document in the error message.
pub fn parse_json_content<T: DeserializeOwned>(content: &str, what: &str) -> WorkerResult<T> {
    serde_json::from_str(strip_code_fences(content)).map_err(|e| {
        WorkerError::malformed_response(format!("failed to parse {} JSON: {}", what, e))
    })
}
