//! Speech service seam.

use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::SpeechResult;

/// Audio bytes streamed back from the synthesis service.
pub type AudioStream = Pin<Box<dyn AsyncRead + Send>>;

/// Text-to-speech endpoint.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Synthesize `text` and return the encoded audio as a stream.
    async fn synthesize(&self, text: &str) -> SpeechResult<AudioStream>;
}
