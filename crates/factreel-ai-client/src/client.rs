//! OpenAI-compatible HTTP client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AiError, AiResult};
use crate::metrics::{record_request, ENDPOINT_CHAT, ENDPOINT_IMAGES};
use crate::service::{ChatService, ImageService};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ImageRequest, ImageResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-4";

/// Configuration for the AI client.
#[derive(Debug, Clone)]
pub struct AiClientConfig {
    /// Base URL of the API (without the `/v1` suffix)
    pub base_url: String,
    /// Model used for chat completions
    pub chat_model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for AiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl AiClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            chat_model: std::env::var("OPENAI_CHAT_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("OPENAI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the chat completion and image generation endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    config: AiClientConfig,
    api_key: String,
}

impl OpenAiClient {
    /// Create a new client authenticated with `api_key`.
    pub fn new(config: AiClientConfig, api_key: impl Into<String>) -> AiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::config_error("API key is empty"));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AiError::Network)?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// Model used when callers build chat requests.
    pub fn chat_model(&self) -> &str {
        &self.config.chat_model
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        path: &str,
        body: &T,
    ) -> AiResult<Response> {
        let url = self.config.endpoint(path);
        debug!("Sending {} request to {}", endpoint, url);

        let started = Instant::now();
        let result = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                record_request(endpoint, 0, latency_ms);
                return Err(AiError::Network(e));
            }
        };

        let status = response.status();
        record_request(endpoint, status.as_u16(), latency_ms);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            warn!("{} request failed with {}: {}", endpoint, status, message);
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatService for OpenAiClient {
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> AiResult<String> {
        let response = self
            .post(ENDPOINT_CHAT, "chat/completions", request)
            .await?;
        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::invalid_response("no content in chat completion"))
    }
}

#[async_trait]
impl ImageService for OpenAiClient {
    async fn create_image(&self, request: &ImageRequest) -> AiResult<ImageResponse> {
        let response = self
            .post(ENDPOINT_IMAGES, "images/generations", request)
            .await?;
        let images: ImageResponse = response.json().await?;
        Ok(images)
    }
}
