//! Source encoding of generated image payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Encoding of the image bytes inside a base64 payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageSourceFormat {
    /// Sniff the format from the payload's magic bytes
    #[default]
    Auto,
    Png,
    #[serde(rename = "webp")]
    WebP,
}

impl ImageSourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSourceFormat::Auto => "auto",
            ImageSourceFormat::Png => "png",
            ImageSourceFormat::WebP => "webp",
        }
    }
}

impl fmt::Display for ImageSourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown image format '{0}' (expected auto, png or webp)")]
pub struct ParseImageFormatError(String);

impl FromStr for ImageSourceFormat {
    type Err = ParseImageFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ImageSourceFormat::Auto),
            "png" => Ok(ImageSourceFormat::Png),
            "webp" => Ok(ImageSourceFormat::WebP),
            other => Err(ParseImageFormatError(other.to_string())),
        }
    }
}
