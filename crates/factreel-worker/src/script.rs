//! Script generation.
//!
//! Sends the user prompt to the chat model and parses the `FakeFact` /
//! `SignOff` pair out of its answer.

use factreel_ai_client::ChatService;
use factreel_models::VideoScript;
use tracing::{debug, info};

use crate::error::{WorkerError, WorkerResult};
use crate::response::parse_json_content;
use crate::services::ChatOptions;

/// Parse a chat answer into a [`VideoScript`].
///
/// Both fields must be present and non-blank; a half-populated answer is
/// rejected as a whole.
pub fn parse_script(content: &str) -> WorkerResult<VideoScript> {
    let script: VideoScript = parse_json_content(content, "video script")?;

    if script.fact.trim().is_empty() {
        return Err(WorkerError::malformed_response("script has an empty FakeFact"));
    }
    if script.sign_off.trim().is_empty() {
        return Err(WorkerError::malformed_response("script has an empty SignOff"));
    }

    Ok(script)
}

/// Ask the chat model for a video script.
pub async fn generate_script(
    chat: &dyn ChatService,
    options: &ChatOptions,
    prompt: &str,
) -> WorkerResult<VideoScript> {
    debug!("Requesting video script ({} char prompt)", prompt.len());

    let content = chat
        .chat_completion(&options.request(prompt))
        .await
        .map_err(|e| WorkerError::from(e).context("chat completion failed"))?;

    let script = parse_script(&content)?;
    info!(
        "Generated script: {} chars, sign-off {} chars",
        script.fact.len(),
        script.sign_off.len()
    );
    Ok(script)
}
