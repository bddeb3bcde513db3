//! Pipeline stage machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stages of one pipeline run, in execution order.
///
/// Each stage names the state reached once the corresponding step succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    #[default]
    Init,
    CredentialsResolved,
    ScriptGenerated,
    AwsSessionReady,
    VoiceOversCreated,
    ImagePromptsDerived,
    FramesGenerated,
    FramesPersisted,
    Done,
}

impl PipelineStage {
    /// All stages in order.
    pub const ALL: [PipelineStage; 9] = [
        PipelineStage::Init,
        PipelineStage::CredentialsResolved,
        PipelineStage::ScriptGenerated,
        PipelineStage::AwsSessionReady,
        PipelineStage::VoiceOversCreated,
        PipelineStage::ImagePromptsDerived,
        PipelineStage::FramesGenerated,
        PipelineStage::FramesPersisted,
        PipelineStage::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Init => "init",
            PipelineStage::CredentialsResolved => "credentials_resolved",
            PipelineStage::ScriptGenerated => "script_generated",
            PipelineStage::AwsSessionReady => "aws_session_ready",
            PipelineStage::VoiceOversCreated => "voice_overs_created",
            PipelineStage::ImagePromptsDerived => "image_prompts_derived",
            PipelineStage::FramesGenerated => "frames_generated",
            PipelineStage::FramesPersisted => "frames_persisted",
            PipelineStage::Done => "done",
        }
    }

    /// Human-readable description of the step that reaches this stage.
    pub fn action(&self) -> &'static str {
        match self {
            PipelineStage::Init => "initializing",
            PipelineStage::CredentialsResolved => "resolving credentials",
            PipelineStage::ScriptGenerated => "generating script",
            PipelineStage::AwsSessionReady => "initializing speech session",
            PipelineStage::VoiceOversCreated => "creating voice-overs",
            PipelineStage::ImagePromptsDerived => "deriving image prompts",
            PipelineStage::FramesGenerated => "generating frames",
            PipelineStage::FramesPersisted => "persisting frames",
            PipelineStage::Done => "finishing",
        }
    }

    /// The stage that follows this one, if any.
    pub fn next(&self) -> Option<PipelineStage> {
        let idx = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
