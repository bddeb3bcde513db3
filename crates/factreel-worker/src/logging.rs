//! Structured run logging utilities.
//!
//! Provides consistent, structured logging for pipeline runs with
//! tracing spans and contextual information.

use factreel_models::{PipelineStage, RunId};
use tracing::{error, info, Span};

/// Default `EnvFilter` directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "factreel=info",
        1 => "factreel=debug",
        _ => "factreel=trace",
    }
}

/// Run logger for structured logging with consistent formatting.
///
/// Every event carries the run ID; stage events also carry the stage name.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
}

impl RunLogger {
    pub fn new(run_id: &RunId) -> Self {
        Self {
            run_id: run_id.to_string(),
        }
    }

    /// Log the start of a stage.
    pub fn log_stage_start(&self, stage: PipelineStage) {
        info!(
            run_id = %self.run_id,
            stage = %stage,
            "Stage started: {}", stage.action()
        );
    }

    /// Log the completion of a stage.
    pub fn log_stage_complete(&self, stage: PipelineStage) {
        info!(
            run_id = %self.run_id,
            stage = %stage,
            "Stage completed"
        );
    }

    /// Log a stage failure.
    pub fn log_stage_failure(&self, stage: PipelineStage, message: &str) {
        error!(
            run_id = %self.run_id,
            stage = %stage,
            "Stage failed while {}: {}", stage.action(), message
        );
    }

    /// Log the completion of the whole run.
    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            "Run completed: {}", message
        );
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Create a tracing span covering the run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("run", run_id = %self.run_id)
    }
}
