//! Shared data models for the FactReel pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Run identifiers and credentials
//! - Video scripts and image prompts
//! - Index-aligned frame results
//! - Artifact naming (voice-overs and frames)
//! - The pipeline stage machine and its state aggregate

pub mod artifacts;
pub mod credentials;
pub mod frame;
pub mod image_format;
pub mod run;
pub mod script;
pub mod stage;
pub mod state;

// Re-export common types
pub use artifacts::{
    frame_file_name, frame_path, voice_over_path, VoiceOverPaths, END_AUDIO_FILE_NAME,
    FRAME_CONCURRENCY_CAP, IMAGE_FILE_PREFIX, MAIN_AUDIO_FILE_NAME, VOICE_OVER_EXTENSION,
};
pub use credentials::Credentials;
pub use frame::{FrameBatch, FramePayload, FrameSlot, ImagePrompt};
pub use image_format::{ImageSourceFormat, ParseImageFormatError};
pub use run::{PipelineReport, RunId};
pub use script::VideoScript;
pub use stage::PipelineStage;
pub use state::{PipelineState, StateError};
