//! Short-video generation binary.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use factreel_models::ImageSourceFormat;
use factreel_worker::logging::default_directive;
use factreel_worker::{LiveServices, Pipeline, PipelineConfig};

/// Generate a narrated fake-fact video's voice-overs and frames.
#[derive(Parser, Debug)]
#[command(name = "factreel")]
#[command(version)]
struct Cli {
    /// Script prompt; read from the prompt file when omitted
    #[arg(long)]
    prompt: Option<String>,

    /// File holding the script prompt
    #[arg(long)]
    prompt_file: Option<PathBuf>,

    /// Meta-prompt template for image prompts
    #[arg(long)]
    template_file: Option<PathBuf>,

    /// Directory receiving voice-overs and frames
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Encoding of generated images (auto, png, webp)
    #[arg(long)]
    image_format: Option<ImageSourceFormat>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(path) = &self.prompt_file {
            config.prompt_file = path.clone();
        }
        if let Some(path) = &self.template_file {
            config.prompt_template_file = path.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(format) = self.image_format {
            config.image_format = format;
        }
    }
}

fn init_tracing(verbosity: u8) {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("Starting factreel");

    let mut config = PipelineConfig::from_env();
    cli.apply(&mut config);
    info!("Pipeline config: {:?}", config);

    let mut pipeline = Pipeline::new(config, LiveServices::from_env());
    if let Some(prompt) = cli.prompt {
        pipeline = pipeline.with_script_prompt(prompt);
    }

    match pipeline.run().await {
        Ok(report) => {
            info!(
                run_id = %report.run_id,
                frames = report.frame_paths.len(),
                "finished operation"
            );
        }
        Err(failure) => {
            error!(stage = %failure.stage, "{}", failure);
            std::process::exit(1);
        }
    }
}
