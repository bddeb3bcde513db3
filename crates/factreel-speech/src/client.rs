//! AWS Polly client implementation.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_polly::config::{Builder, Region};
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{Engine, OutputFormat, VoiceId};
use aws_sdk_polly::Client;
use tracing::{debug, info};

use crate::error::{SpeechError, SpeechResult};
use crate::service::{AudioStream, SpeechService};

/// Configuration for the Polly client.
#[derive(Debug, Clone)]
pub struct PollyConfig {
    /// AWS region hosting Polly
    pub region: String,
    /// Voice used for every segment
    pub voice_id: String,
    /// Synthesis engine tier ("standard", "neural", ...)
    pub engine: String,
}

impl Default for PollyConfig {
    fn default() -> Self {
        Self {
            region: "us-west-2".to_string(),
            voice_id: "Gregory".to_string(),
            engine: "neural".to_string(),
        }
    }
}

impl PollyConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            region: std::env::var("AWS_REGION").unwrap_or(defaults.region),
            voice_id: std::env::var("POLLY_VOICE_ID").unwrap_or(defaults.voice_id),
            engine: std::env::var("POLLY_ENGINE").unwrap_or(defaults.engine),
        }
    }
}

/// AWS Polly speech client.
#[derive(Clone)]
pub struct PollyClient {
    client: Client,
    config: PollyConfig,
}

impl PollyClient {
    /// Create a new Polly client with static credentials.
    pub fn new(
        config: PollyConfig,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> SpeechResult<Self> {
        if config.region.trim().is_empty() {
            return Err(SpeechError::config_error("AWS region is empty"));
        }
        if access_key_id.is_empty() || secret_access_key.is_empty() {
            return Err(SpeechError::config_error("AWS credentials are empty"));
        }

        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "factreel",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .build();

        info!(
            region = %config.region,
            voice = %config.voice_id,
            "Initialized Polly session"
        );

        Ok(Self {
            client: Client::from_conf(sdk_config),
            config,
        })
    }

    pub fn config(&self) -> &PollyConfig {
        &self.config
    }
}

#[async_trait]
impl SpeechService for PollyClient {
    async fn synthesize(&self, text: &str) -> SpeechResult<AudioStream> {
        debug!("Synthesizing {} characters with voice {}", text.len(), self.config.voice_id);

        let output = self
            .client
            .synthesize_speech()
            .engine(Engine::from(self.config.engine.as_str()))
            .output_format(OutputFormat::Mp3)
            .text(text)
            .voice_id(VoiceId::from(self.config.voice_id.as_str()))
            .send()
            .await
            .map_err(|e| SpeechError::synthesis_failed(DisplayErrorContext(&e).to_string()))?;

        Ok(Box::pin(output.audio_stream.into_async_read()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PollyConfig::default();
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.voice_id, "Gregory");
        assert_eq!(config.engine, "neural");
    }

    #[test]
    fn test_empty_region_rejected() {
        let config = PollyConfig {
            region: String::new(),
            ..Default::default()
        };
        let result = PollyClient::new(config, "AKIA", "secret");
        assert!(matches!(result, Err(SpeechError::ConfigError(_))));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let result = PollyClient::new(PollyConfig::default(), "", "secret");
        assert!(matches!(result, Err(SpeechError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_client_builds_without_network() {
        let client = PollyClient::new(PollyConfig::default(), "AKIA", "secret").unwrap();
        assert_eq!(client.config().voice_id, "Gregory");
    }
}
