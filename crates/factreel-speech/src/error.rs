//! Speech error types.

use thiserror::Error;

/// Result type for speech operations.
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Errors that can occur while synthesizing speech.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Failed to configure speech client: {0}")]
    ConfigError(String),

    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),
}

impl SpeechError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn synthesis_failed(msg: impl Into<String>) -> Self {
        Self::SynthesisFailed(msg.into())
    }
}
