//! Short-video generation pipeline.
//!
//! This crate handles:
//! - Credential resolution from the environment
//! - Script and image prompt generation through the chat service
//! - Voice-over synthesis
//! - Capped parallel frame generation and frame persistence
//! - Stage-by-stage orchestration of a single run

pub mod config;
pub mod credentials;
pub mod error;
pub mod frames;
pub mod image_prompts;
pub mod logging;
pub mod pipeline;
pub mod response;
pub mod script;
pub mod services;
pub mod voiceover;

pub use config::PipelineConfig;
pub use credentials::{credentials_from_env, env_lookup, resolve_credentials};
pub use error::{WorkerError, WorkerResult};
pub use frames::{generate_frames, FrameRequestOptions, IMAGE_CALLER_TAG};
pub use image_prompts::{derive_image_prompts, parse_image_prompts, render_template};
pub use logging::RunLogger;
pub use pipeline::{read_prompt_file, Pipeline, PipelineFailure};
pub use script::{generate_script, parse_script};
pub use services::{AiServices, ChatOptions, LiveServices, ServiceProvider};
pub use voiceover::create_voice_overs;
