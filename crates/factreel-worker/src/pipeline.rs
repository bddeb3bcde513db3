//! Pipeline orchestrator.
//!
//! Runs the stages in their fixed order against one [`PipelineState`]. Each
//! stage either completes and advances the state, or fails the run. Nothing
//! is retried, and files written by earlier stages are left on disk.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use factreel_media::{ensure_dir, persist_frames};
use factreel_models::{PipelineReport, PipelineStage, PipelineState, RunId, VoiceOverPaths};
use factreel_speech::SpeechService;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, info, Instrument};

use crate::config::PipelineConfig;
use crate::credentials::{env_lookup, resolve_credentials};
use crate::error::{WorkerError, WorkerResult};
use crate::frames::{generate_frames, FrameRequestOptions};
use crate::image_prompts::derive_image_prompts;
use crate::logging::RunLogger;
use crate::script::generate_script;
use crate::services::{AiServices, ChatOptions, ServiceProvider};
use crate::voiceover::create_voice_overs;

const RUNS_TOTAL: &str = "factreel_runs_total";

type CredentialLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A failed run, tagged with the stage it was working towards.
#[derive(Debug, Error)]
#[error("pipeline failed while {}: {}", .stage.action(), .error)]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    #[source]
    pub error: WorkerError,
}

/// Clients built during the run, once credentials are known.
#[derive(Default)]
struct RunContext {
    ai: Option<AiServices>,
    speech: Option<Arc<dyn SpeechService>>,
}

impl RunContext {
    fn ai(&self) -> WorkerResult<&AiServices> {
        self.ai
            .as_ref()
            .ok_or_else(|| WorkerError::config_error("chat client not initialized"))
    }

    fn speech(&self) -> WorkerResult<&dyn SpeechService> {
        self.speech
            .as_deref()
            .ok_or_else(|| WorkerError::config_error("speech client not initialized"))
    }
}

/// Short-video generation pipeline.
pub struct Pipeline<P: ServiceProvider> {
    config: PipelineConfig,
    provider: P,
    script_prompt: Option<String>,
    credential_lookup: CredentialLookup,
}

impl<P: ServiceProvider> Pipeline<P> {
    /// Create a pipeline reading credentials from the process environment.
    pub fn new(config: PipelineConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            script_prompt: None,
            credential_lookup: Box::new(env_lookup),
        }
    }

    /// Use `prompt` instead of reading the prompt file.
    ///
    /// A blank prompt fails the script stage like an empty prompt file.
    pub fn with_script_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.script_prompt = Some(prompt.into());
        self
    }

    /// Resolve credentials through `lookup` instead of the environment.
    pub fn with_credential_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.credential_lookup = Box::new(lookup);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage once, stopping at the first failure.
    pub async fn run(&self) -> Result<PipelineReport, PipelineFailure> {
        let mut state = PipelineState::new(RunId::new());
        let logger = RunLogger::new(state.run_id());
        let span = logger.create_span();

        self.run_stages(&mut state, &logger).instrument(span).await
    }

    async fn run_stages(
        &self,
        state: &mut PipelineState,
        logger: &RunLogger,
    ) -> Result<PipelineReport, PipelineFailure> {
        let mut ctx = RunContext::default();

        while let Some(stage) = state.stage().next() {
            logger.log_stage_start(stage);

            let outcome = match self.execute_stage(stage, state, &mut ctx).await {
                Ok(()) => state.advance(stage).map_err(WorkerError::from),
                Err(e) => Err(e),
            };

            if let Err(error) = outcome {
                logger.log_stage_failure(stage, &error.to_string());
                counter!(RUNS_TOTAL, "outcome" => "failure", "stage" => stage.as_str()).increment(1);
                return Err(PipelineFailure { stage, error });
            }

            logger.log_stage_complete(stage);
        }

        let report = self
            .build_report(state)
            .map_err(|error| PipelineFailure {
                stage: state.stage(),
                error,
            })?;

        counter!(RUNS_TOTAL, "outcome" => "success", "stage" => PipelineStage::Done.as_str())
            .increment(1);
        logger.log_completion(&format!(
            "{} frames, {} prompts skipped, {:.1}s",
            report.frame_paths.len(),
            report.skipped_prompts(),
            report.duration_secs()
        ));

        Ok(report)
    }

    async fn execute_stage(
        &self,
        stage: PipelineStage,
        state: &mut PipelineState,
        ctx: &mut RunContext,
    ) -> WorkerResult<()> {
        match stage {
            PipelineStage::Init | PipelineStage::Done => Ok(()),

            PipelineStage::CredentialsResolved => {
                let credentials = resolve_credentials(|name| (self.credential_lookup)(name))?;
                state.set_credentials(credentials)?;
                Ok(())
            }

            PipelineStage::ScriptGenerated => {
                let ai = self.provider.ai_services(state.credentials()?)?;
                let prompt = self.script_prompt().await?;
                let options = self.chat_options(&ai);

                let script = generate_script(ai.chat.as_ref(), &options, &prompt).await?;
                debug!("Script: {} / sign-off: {}", script.fact, script.sign_off);

                ctx.ai = Some(ai);
                state.set_script(script)?;
                Ok(())
            }

            PipelineStage::AwsSessionReady => {
                ctx.speech = Some(self.provider.speech_service(state.credentials()?)?);
                Ok(())
            }

            PipelineStage::VoiceOversCreated => {
                ensure_dir(&self.config.output_dir).await?;
                let paths = VoiceOverPaths::in_dir(&self.config.output_dir);
                state.set_voice_overs(paths.clone())?;

                create_voice_overs(ctx.speech()?, state.script()?, &paths).await
            }

            PipelineStage::ImagePromptsDerived => {
                let ai = ctx.ai()?;
                let template = read_prompt_file(&self.config.prompt_template_file).await?;
                let options = self.chat_options(ai);

                let prompts =
                    derive_image_prompts(ai.chat.as_ref(), &options, &template, &state.script()?.fact)
                        .await?;
                info!("Derived {} image prompts", prompts.len());

                state.set_image_prompts(prompts)?;
                Ok(())
            }

            PipelineStage::FramesGenerated => {
                let options = FrameRequestOptions {
                    size: self.config.image_size,
                    ..Default::default()
                };
                let batch =
                    generate_frames(Arc::clone(&ctx.ai()?.images), state.image_prompts(), &options)
                        .await?;

                state.set_frames(batch)?;
                Ok(())
            }

            PipelineStage::FramesPersisted => {
                let persisted = persist_frames(
                    state.frames()?,
                    &self.config.output_dir,
                    self.config.image_format,
                )
                .await?;

                state.set_frame_paths(persisted.into_iter().map(|f| f.path).collect());
                Ok(())
            }
        }
    }

    fn chat_options(&self, ai: &AiServices) -> ChatOptions {
        ChatOptions::new(ai.chat_model.clone(), self.config.json_mode)
    }

    async fn script_prompt(&self) -> WorkerResult<String> {
        match &self.script_prompt {
            Some(prompt) if prompt.trim().is_empty() => {
                Err(WorkerError::config_error("script prompt is empty"))
            }
            Some(prompt) => Ok(prompt.clone()),
            None => read_prompt_file(&self.config.prompt_file).await,
        }
    }

    fn build_report(&self, state: &PipelineState) -> WorkerResult<PipelineReport> {
        let voice_overs = state
            .voice_overs()
            .cloned()
            .ok_or_else(|| WorkerError::config_error("voice-over paths missing from state"))?;

        Ok(PipelineReport {
            run_id: state.run_id().clone(),
            started_at: state.started_at(),
            finished_at: Utc::now(),
            voice_overs,
            prompt_count: state.image_prompts().len(),
            frame_paths: state.frame_paths().to_vec(),
        })
    }
}

/// Read a prompt or template file, rejecting empty content.
pub async fn read_prompt_file(path: &Path) -> WorkerResult<String> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        WorkerError::config_error(format!("cannot read {}: {}", path.display(), e))
    })?;

    if content.trim().is_empty() {
        return Err(WorkerError::config_error(format!(
            "{} is empty",
            path.display()
        )));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_failure_message_names_stage() {
        let failure = PipelineFailure {
            stage: PipelineStage::FramesGenerated,
            error: WorkerError::upstream("boom"),
        };
        assert_eq!(
            failure.to_string(),
            "pipeline failed while generating frames: Upstream error: boom"
        );
    }

    #[tokio::test]
    async fn test_read_prompt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "Tell me a fake fact").unwrap();

        assert_eq!(read_prompt_file(&path).await.unwrap(), "Tell me a fake fact");
    }

    #[tokio::test]
    async fn test_read_prompt_file_missing_or_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(matches!(
            read_prompt_file(&missing).await,
            Err(WorkerError::ConfigError(_))
        ));

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "  \n").unwrap();
        assert!(matches!(
            read_prompt_file(&empty).await,
            Err(WorkerError::ConfigError(_))
        ));
    }
}
