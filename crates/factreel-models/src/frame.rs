//! Image prompts and index-aligned frame results.

use serde::{Deserialize, Serialize};

/// A single per-frame image prompt.
///
/// The chat model answers either with bare strings or with
/// `{"imagePrompt": "..."}` objects; both deserialize into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ImagePromptRepr")]
pub struct ImagePrompt {
    #[serde(rename = "imagePrompt")]
    pub prompt: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImagePromptRepr {
    Text(String),
    Object {
        #[serde(rename = "imagePrompt")]
        prompt: String,
    },
}

impl From<ImagePromptRepr> for ImagePrompt {
    fn from(repr: ImagePromptRepr) -> Self {
        match repr {
            ImagePromptRepr::Text(prompt) | ImagePromptRepr::Object { prompt } => Self { prompt },
        }
    }
}

impl ImagePrompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.prompt
    }
}

/// Base64 image payload returned for one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePayload {
    /// Index of the prompt that produced this payload
    pub prompt_index: usize,
    /// Base64-encoded image bytes
    pub b64_json: String,
}

/// Outcome slot for one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FrameSlot {
    /// An image was generated for this prompt
    Generated(FramePayload),
    /// The prompt was beyond the concurrency cap and never requested
    #[default]
    Absent,
}

impl FrameSlot {
    pub fn is_generated(&self) -> bool {
        matches!(self, FrameSlot::Generated(_))
    }

    pub fn payload(&self) -> Option<&FramePayload> {
        match self {
            FrameSlot::Generated(payload) => Some(payload),
            FrameSlot::Absent => None,
        }
    }
}

/// Index-aligned frame results for a whole prompt set.
///
/// Slot `i` belongs to prompt `i`. The batch always has one slot per prompt;
/// prompts that were skipped hold [`FrameSlot::Absent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameBatch {
    slots: Vec<FrameSlot>,
}

impl FrameBatch {
    pub fn new(slots: Vec<FrameSlot>) -> Self {
        Self { slots }
    }

    /// Number of slots (equals the number of prompts).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[FrameSlot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&FrameSlot> {
        self.slots.get(index)
    }

    /// Generated payloads in index order, paired with their slot index.
    pub fn generated(&self) -> impl Iterator<Item = (usize, &FramePayload)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.payload().map(|p| (idx, p)))
    }

    pub fn generated_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_generated()).count()
    }
}
