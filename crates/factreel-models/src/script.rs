//! Narration script returned by the chat model.

use serde::{Deserialize, Serialize};

/// Main narration and closing sign-off.
///
/// Both halves come from one JSON object and are only ever stored together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoScript {
    /// Main narration text
    #[serde(rename = "FakeFact")]
    pub fact: String,
    /// Closing segment, voiced separately
    #[serde(rename = "SignOff")]
    pub sign_off: String,
}

impl VideoScript {
    pub fn new(fact: impl Into<String>, sign_off: impl Into<String>) -> Self {
        Self {
            fact: fact.into(),
            sign_off: sign_off.into(),
        }
    }
}
