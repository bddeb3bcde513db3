//! Service traits consumed by the pipeline.
//!
//! The pipeline only talks to these traits, so tests can swap in
//! in-process fakes for the HTTP client.

use async_trait::async_trait;

use crate::error::AiResult;
use crate::types::{ChatCompletionRequest, ImageRequest, ImageResponse};

/// Chat completion endpoint.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one completion request and return the first choice's content.
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> AiResult<String>;
}

/// Image generation endpoint.
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn create_image(&self, request: &ImageRequest) -> AiResult<ImageResponse>;
}
