//! Client for OpenAI-compatible chat completion and image generation.
//!
//! This crate provides:
//! - Request/response types for the chat and image endpoints
//! - The [`ChatService`] and [`ImageService`] seams used by the pipeline
//! - [`OpenAiClient`], the reqwest implementation of both
//! - Request metrics

pub mod client;
pub mod error;
pub mod metrics;
pub mod service;
pub mod types;

pub use client::{AiClientConfig, OpenAiClient};
pub use error::{AiError, AiResult};
pub use service::{ChatService, ImageService};
pub use types::{
    ChatCompletionRequest, ChatMessage, ChatRole, ImageData, ImageRequest, ImageResponse,
    ImageResponseFormat, ImageSize, ResponseFormat,
};
