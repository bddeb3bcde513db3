//! The per-run state aggregate.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{Credentials, FrameBatch, ImagePrompt, PipelineStage, RunId, VideoScript, VoiceOverPaths};

/// Violations of the state aggregate's write-once and ordering rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("cannot move from stage {from} to {to}")]
    OutOfOrder {
        from: PipelineStage,
        to: PipelineStage,
    },

    #[error("{0} already set")]
    AlreadySet(&'static str),

    #[error("{0} not available yet")]
    Missing(&'static str),
}

/// Everything one run accumulates, owned by the orchestrator.
///
/// Each field is written once by the stage that produces it. Accessors for
/// values that a later stage depends on return [`StateError::Missing`] when
/// called too early.
#[derive(Debug)]
pub struct PipelineState {
    run_id: RunId,
    started_at: DateTime<Utc>,
    stage: PipelineStage,
    credentials: Option<Credentials>,
    script: Option<VideoScript>,
    voice_overs: Option<VoiceOverPaths>,
    image_prompts: Vec<ImagePrompt>,
    frames: Option<FrameBatch>,
    frame_paths: Vec<PathBuf>,
}

impl PipelineState {
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            stage: PipelineStage::Init,
            credentials: None,
            script: None,
            voice_overs: None,
            image_prompts: Vec::new(),
            frames: None,
            frame_paths: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Move to `to`, which must be the stage directly after the current one.
    pub fn advance(&mut self, to: PipelineStage) -> Result<(), StateError> {
        if self.stage.next() != Some(to) {
            return Err(StateError::OutOfOrder {
                from: self.stage,
                to,
            });
        }
        self.stage = to;
        Ok(())
    }

    pub fn set_credentials(&mut self, credentials: Credentials) -> Result<(), StateError> {
        set_once(&mut self.credentials, credentials, "credentials")
    }

    pub fn credentials(&self) -> Result<&Credentials, StateError> {
        self.credentials
            .as_ref()
            .ok_or(StateError::Missing("credentials"))
    }

    /// Store the script and sign-off together.
    pub fn set_script(&mut self, script: VideoScript) -> Result<(), StateError> {
        set_once(&mut self.script, script, "script")
    }

    pub fn script(&self) -> Result<&VideoScript, StateError> {
        self.script.as_ref().ok_or(StateError::Missing("script"))
    }

    pub fn set_voice_overs(&mut self, paths: VoiceOverPaths) -> Result<(), StateError> {
        set_once(&mut self.voice_overs, paths, "voice-over paths")
    }

    pub fn voice_overs(&self) -> Option<&VoiceOverPaths> {
        self.voice_overs.as_ref()
    }

    pub fn set_image_prompts(&mut self, prompts: Vec<ImagePrompt>) -> Result<(), StateError> {
        if !self.image_prompts.is_empty() {
            return Err(StateError::AlreadySet("image prompts"));
        }
        self.image_prompts = prompts;
        Ok(())
    }

    pub fn image_prompts(&self) -> &[ImagePrompt] {
        &self.image_prompts
    }

    pub fn set_frames(&mut self, frames: FrameBatch) -> Result<(), StateError> {
        set_once(&mut self.frames, frames, "frame results")
    }

    pub fn frames(&self) -> Result<&FrameBatch, StateError> {
        self.frames.as_ref().ok_or(StateError::Missing("frame results"))
    }

    pub fn set_frame_paths(&mut self, paths: Vec<PathBuf>) {
        self.frame_paths = paths;
    }

    pub fn frame_paths(&self) -> &[PathBuf] {
        &self.frame_paths
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, what: &'static str) -> Result<(), StateError> {
    if slot.is_some() {
        return Err(StateError::AlreadySet(what));
    }
    *slot = Some(value);
    Ok(())
}
