//! Artifact naming for voice-overs and frames.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Base name of the main narration track.
pub const MAIN_AUDIO_FILE_NAME: &str = "voiceover_a";
/// Base name of the sign-off track.
pub const END_AUDIO_FILE_NAME: &str = "voiceover_b";
/// Extension shared by both voice-over tracks.
pub const VOICE_OVER_EXTENSION: &str = "mp3";
/// Prefix of every persisted frame.
pub const IMAGE_FILE_PREFIX: &str = "vid_frame";

/// Maximum number of image requests dispatched per run.
///
/// Prompts at or beyond this index are skipped. Each generated image is
/// billed, so this is a cost limit rather than a queue depth.
pub const FRAME_CONCURRENCY_CAP: usize = 3;

/// Path of a voice-over track inside `dir`.
pub fn voice_over_path(dir: impl AsRef<Path>, base_name: &str) -> PathBuf {
    dir.as_ref()
        .join(format!("{}.{}", base_name, VOICE_OVER_EXTENSION))
}

/// File name of the frame at `index`, e.g. `vid_frame_2.png`.
pub fn frame_file_name(index: usize) -> String {
    format!("{}_{}.png", IMAGE_FILE_PREFIX, index)
}

/// Path of the frame at `index` inside `dir`.
pub fn frame_path(dir: impl AsRef<Path>, index: usize) -> PathBuf {
    dir.as_ref().join(frame_file_name(index))
}

/// Destinations of the two voice-over tracks.
///
/// Assigned before synthesis starts; never derived from the synthesis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceOverPaths {
    /// Main narration (`voiceover_a.mp3`)
    pub script: PathBuf,
    /// Closing segment (`voiceover_b.mp3`)
    pub sign_off: PathBuf,
}

impl VoiceOverPaths {
    /// Fixed voice-over destinations inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            script: voice_over_path(dir, MAIN_AUDIO_FILE_NAME),
            sign_off: voice_over_path(dir, END_AUDIO_FILE_NAME),
        }
    }
}
