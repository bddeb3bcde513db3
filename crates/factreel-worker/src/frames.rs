//! Parallel frame generation.
//!
//! One image request is spawned per prompt, up to a fixed cap. Every task
//! owns its own `(index, prompt)` pair and hands its result back through the
//! join handle; only this function writes into the slot vector, after the
//! task has finished. The first failure aborts the remaining tasks and fails
//! the whole batch.

use std::sync::Arc;

use factreel_ai_client::{ImageRequest, ImageService, ImageSize};
use factreel_models::{FrameBatch, FramePayload, FrameSlot, ImagePrompt, FRAME_CONCURRENCY_CAP};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{WorkerError, WorkerResult};

/// Caller tag sent with every image request.
pub const IMAGE_CALLER_TAG: &str = "tt-fn";

/// Parameters shared by every image request in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRequestOptions {
    pub size: ImageSize,
    pub caller_tag: String,
    /// Number of prompts actually sent
    pub cap: usize,
}

impl Default for FrameRequestOptions {
    fn default() -> Self {
        Self {
            size: ImageSize::Square512,
            caller_tag: IMAGE_CALLER_TAG.to_string(),
            cap: FRAME_CONCURRENCY_CAP,
        }
    }
}

impl FrameRequestOptions {
    fn request_for(&self, prompt: &ImagePrompt) -> ImageRequest {
        ImageRequest::single_b64(prompt.as_str(), self.size).with_user(&self.caller_tag)
    }
}

/// Generate one image for each of the first `options.cap` prompts.
///
/// The returned batch has one slot per prompt. Slots beyond the cap are
/// [`FrameSlot::Absent`]; they are neither requested nor treated as errors.
/// Slot `i` always holds the result of prompt `i`, whatever order the
/// requests complete in.
pub async fn generate_frames(
    images: Arc<dyn ImageService>,
    prompts: &[ImagePrompt],
    options: &FrameRequestOptions,
) -> WorkerResult<FrameBatch> {
    if prompts.is_empty() {
        return Err(WorkerError::EmptyPromptSet);
    }

    let dispatched = prompts.len().min(options.cap);
    let mut tasks = JoinSet::new();

    for (index, prompt) in prompts.iter().enumerate().take(dispatched) {
        let images = Arc::clone(&images);
        let request = options.request_for(prompt);
        debug!(index, "Dispatching image request");
        tasks.spawn(async move {
            let result = images.create_image(&request).await;
            (index, result)
        });
    }

    for index in dispatched..prompts.len() {
        debug!(index, cap = options.cap, "Skipping prompt beyond concurrency cap");
    }

    let mut slots = vec![FrameSlot::Absent; prompts.len()];

    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok((index, Ok(response))) => match response.first_b64() {
                Some(b64) => Ok((index, b64.to_string())),
                None => Err(WorkerError::upstream(format!(
                    "image request {} returned no image data",
                    index
                ))),
            },
            Ok((index, Err(e))) => Err(WorkerError::upstream(format!(
                "image request {} failed: {}",
                index, e
            ))),
            Err(e) => Err(WorkerError::upstream(format!("image task failed: {}", e))),
        };

        match outcome {
            Ok((index, b64_json)) => {
                slots[index] = FrameSlot::Generated(FramePayload {
                    prompt_index: index,
                    b64_json,
                });
            }
            Err(err) => {
                warn!(
                    outstanding = tasks.len(),
                    "Image batch failed, aborting outstanding requests: {}", err
                );
                tasks.abort_all();
                return Err(err);
            }
        }
    }

    let batch = FrameBatch::new(slots);
    info!(
        generated = batch.generated_count(),
        skipped = prompts.len() - dispatched,
        "Generated frames"
    );
    Ok(batch)
}
