//! Image prompt derivation.
//!
//! A meta-prompt template is filled with the generated script and sent to
//! the chat model, which answers with one image prompt per frame.

use factreel_ai_client::ChatService;
use factreel_models::ImagePrompt;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{WorkerError, WorkerResult};
use crate::response::parse_json_content;
use crate::services::ChatOptions;

/// Placeholder replaced by the script text.
pub const SCRIPT_PLACEHOLDER: &str = "%s";

#[derive(Deserialize)]
#[serde(untagged)]
enum PromptEnvelope {
    List(Vec<ImagePrompt>),
    Wrapped { prompts: Vec<ImagePrompt> },
}

/// Substitute `script` into `template`.
///
/// The template must contain exactly one [`SCRIPT_PLACEHOLDER`].
pub fn render_template(template: &str, script: &str) -> WorkerResult<String> {
    let count = template.matches(SCRIPT_PLACEHOLDER).count();
    if count != 1 {
        return Err(WorkerError::config_error(format!(
            "prompt template must contain exactly one '{}' placeholder, found {}",
            SCRIPT_PLACEHOLDER, count
        )));
    }
    Ok(template.replacen(SCRIPT_PLACEHOLDER, script, 1))
}

/// Parse a chat answer into an ordered, non-empty prompt list.
///
/// Accepts a bare array or an object with a `prompts` array; elements may be
/// strings or `{"imagePrompt": "..."}` objects.
pub fn parse_image_prompts(content: &str) -> WorkerResult<Vec<ImagePrompt>> {
    let prompts = match parse_json_content::<PromptEnvelope>(content, "image prompt")? {
        PromptEnvelope::List(prompts) | PromptEnvelope::Wrapped { prompts } => prompts,
    };

    if prompts.is_empty() {
        return Err(WorkerError::EmptyPromptSet);
    }
    Ok(prompts)
}

/// Ask the chat model for per-frame image prompts describing `script`.
pub async fn derive_image_prompts(
    chat: &dyn ChatService,
    options: &ChatOptions,
    template: &str,
    script: &str,
) -> WorkerResult<Vec<ImagePrompt>> {
    let prompt = render_template(template, script)?;
    debug!("Requesting image prompts ({} char meta-prompt)", prompt.len());

    let content = chat
        .chat_completion(&options.request(&prompt))
        .await
        .map_err(|e| WorkerError::from(e).context("chat completion failed"))?;

    let prompts = parse_image_prompts(&content)?;
    info!("Derived {} image prompts", prompts.len());
    Ok(prompts)
}
