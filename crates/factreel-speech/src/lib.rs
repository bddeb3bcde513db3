//! AWS Polly text-to-speech client.
//!
//! This crate provides:
//! - The [`SpeechService`] seam used by the voice-over stage
//! - [`PollyClient`], an AWS Polly implementation with static credentials

pub mod client;
pub mod error;
pub mod service;

pub use client::{PollyClient, PollyConfig};
pub use error::{SpeechError, SpeechResult};
pub use service::{AudioStream, SpeechService};
