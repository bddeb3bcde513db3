//! Upstream service construction.
//!
//! The orchestrator builds its clients through [`ServiceProvider`] once the
//! credentials are known, so tests can substitute in-process fakes.

use std::sync::Arc;

use factreel_ai_client::{
    AiClientConfig, ChatCompletionRequest, ChatService, ImageService, OpenAiClient,
};
use factreel_models::Credentials;
use factreel_speech::{PollyClient, PollyConfig, SpeechService};

use crate::error::WorkerResult;

/// How chat requests are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOptions {
    pub model: String,
    /// Attach the JSON-object response format hint
    pub json_mode: bool,
}

impl ChatOptions {
    pub fn new(model: impl Into<String>, json_mode: bool) -> Self {
        Self {
            model: model.into(),
            json_mode,
        }
    }

    /// A single user-message request for `prompt`.
    pub fn request(&self, prompt: &str) -> ChatCompletionRequest {
        let request = ChatCompletionRequest::user_prompt(&self.model, prompt);
        if self.json_mode {
            request.with_json_response()
        } else {
            request
        }
    }
}

/// Chat and image clients sharing one API token.
#[derive(Clone)]
pub struct AiServices {
    pub chat: Arc<dyn ChatService>,
    pub images: Arc<dyn ImageService>,
    /// Model used for chat requests
    pub chat_model: String,
}

/// Builds the upstream clients for a run.
pub trait ServiceProvider: Send + Sync {
    /// Chat and image clients authenticated with the LLM token.
    fn ai_services(&self, credentials: &Credentials) -> WorkerResult<AiServices>;

    /// Speech client authenticated with the AWS key pair.
    fn speech_service(&self, credentials: &Credentials) -> WorkerResult<Arc<dyn SpeechService>>;
}

/// Provider backed by the real OpenAI and Polly clients.
#[derive(Debug, Clone, Default)]
pub struct LiveServices {
    pub ai: AiClientConfig,
    pub polly: PollyConfig,
}

impl LiveServices {
    pub fn new(ai: AiClientConfig, polly: PollyConfig) -> Self {
        Self { ai, polly }
    }

    pub fn from_env() -> Self {
        Self::new(AiClientConfig::from_env(), PollyConfig::from_env())
    }
}

impl ServiceProvider for LiveServices {
    fn ai_services(&self, credentials: &Credentials) -> WorkerResult<AiServices> {
        let client = Arc::new(OpenAiClient::new(self.ai.clone(), credentials.openai_token())?);
        Ok(AiServices {
            chat_model: client.chat_model().to_string(),
            chat: client.clone(),
            images: client,
        })
    }

    fn speech_service(&self, credentials: &Credentials) -> WorkerResult<Arc<dyn SpeechService>> {
        let client = PollyClient::new(
            self.polly.clone(),
            credentials.aws_access_id(),
            credentials.aws_access_key(),
        )?;
        Ok(Arc::new(client))
    }
}
