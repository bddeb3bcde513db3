//! Frame decoding and artifact persistence.
//!
//! This crate provides:
//! - Base64 frame decoding with PNG/WebP source support
//! - PNG re-encoding and sequential frame persistence
//! - Synced file writes for streamed audio

pub mod error;
pub mod frames;
pub mod fs_utils;

pub use error::{MediaError, MediaResult};
pub use frames::{persist_frame, persist_frames, transcode_to_png, PersistedFrame, TranscodedFrame};
pub use fs_utils::{ensure_dir, stream_to_file, write_synced};
