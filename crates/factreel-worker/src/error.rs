//! Worker error types.

use factreel_ai_client::AiError;
use factreel_media::MediaError;
use factreel_models::StateError;
use factreel_speech::SpeechError;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Missing credential: {0} not set")]
    MissingCredential(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("No image prompts generated")]
    EmptyPromptSet,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid pipeline state: {0}")]
    State(#[from] StateError),
}

impl WorkerError {
    pub fn missing_credential(name: impl Into<String>) -> Self {
        Self::MissingCredential(name.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Prefix the message with `context`, keeping the error kind.
    pub fn context(self, context: &str) -> Self {
        match self {
            Self::Upstream(msg) => Self::Upstream(format!("{}: {}", context, msg)),
            Self::MalformedResponse(msg) => Self::MalformedResponse(format!("{}: {}", context, msg)),
            Self::MalformedPayload(msg) => Self::MalformedPayload(format!("{}: {}", context, msg)),
            Self::Persistence(msg) => Self::Persistence(format!("{}: {}", context, msg)),
            Self::ConfigError(msg) => Self::ConfigError(format!("{}: {}", context, msg)),
            other => other,
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, WorkerError::Upstream(_))
    }
}

impl From<AiError> for WorkerError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::ConfigError(msg) => Self::ConfigError(msg),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<SpeechError> for WorkerError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::ConfigError(msg) => Self::ConfigError(msg),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<MediaError> for WorkerError {
    fn from(err: MediaError) -> Self {
        if err.is_payload_error() {
            Self::MalformedPayload(err.to_string())
        } else if err.is_source_error() {
            Self::Upstream(err.to_string())
        } else {
            Self::Persistence(err.to_string())
        }
    }
}
