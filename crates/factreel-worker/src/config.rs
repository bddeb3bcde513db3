//! Pipeline configuration.

use std::path::PathBuf;

use factreel_ai_client::ImageSize;
use factreel_models::ImageSourceFormat;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory receiving voice-overs and frames
    pub output_dir: PathBuf,
    /// File holding the script prompt, used when no prompt is given inline
    pub prompt_file: PathBuf,
    /// Meta-prompt template for image prompts (one `%s` placeholder)
    pub prompt_template_file: PathBuf,
    /// Expected encoding of generated image payloads
    pub image_format: ImageSourceFormat,
    /// Size requested for generated images
    pub image_size: ImageSize,
    /// Attach the JSON-object response hint to chat requests
    pub json_mode: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            prompt_file: PathBuf::from("prompt.txt"),
            prompt_template_file: PathBuf::from("prompt_prompt.txt"),
            image_format: ImageSourceFormat::Auto,
            image_size: ImageSize::Square512,
            json_mode: false,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            output_dir: std::env::var("FACTREEL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            prompt_file: std::env::var("FACTREEL_PROMPT_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.prompt_file),
            prompt_template_file: std::env::var("FACTREEL_PROMPT_TEMPLATE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.prompt_template_file),
            image_format: std::env::var("FACTREEL_IMAGE_FORMAT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.image_format),
            image_size: defaults.image_size,
            json_mode: std::env::var("OPENAI_JSON_MODE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.json_mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.prompt_file, PathBuf::from("prompt.txt"));
        assert_eq!(config.prompt_template_file, PathBuf::from("prompt_prompt.txt"));
        assert_eq!(config.image_format, ImageSourceFormat::Auto);
        assert_eq!(config.image_size, ImageSize::Square512);
        assert!(!config.json_mode);
    }
}
