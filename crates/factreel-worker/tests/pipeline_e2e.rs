//! End-to-end pipeline runs against in-process fake services.

use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageBuffer, ImageOutputFormat, Rgb};
use tempfile::TempDir;

use factreel_ai_client::{
    AiError, AiResult, ChatCompletionRequest, ChatService, ImageData, ImageRequest,
    ImageResponse, ImageService,
};
use factreel_models::{Credentials, PipelineStage};
use factreel_speech::{AudioStream, SpeechResult, SpeechService};
use factreel_worker::{
    AiServices, Pipeline, PipelineConfig, ServiceProvider, WorkerError, WorkerResult,
};

const TEMPLATE: &str = "Describe a frame for each sentence of: %s";

fn png_b64() -> String {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, Rgb([200, 40, 40]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageOutputFormat::Png).unwrap();
    STANDARD.encode(bytes.into_inner())
}

/// Chat service replying with canned content in order.
struct CannedChat {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatService for CannedChat {
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> AiResult<String> {
        self.prompts
            .lock()
            .unwrap()
            .push(request.messages[0].content.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AiError::invalid_response("no reply queued"))
    }
}

struct FakeImages {
    failing: Option<String>,
    requested: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageService for FakeImages {
    async fn create_image(&self, request: &ImageRequest) -> AiResult<ImageResponse> {
        self.requested.lock().unwrap().push(request.prompt.clone());
        if self.failing.as_deref() == Some(request.prompt.as_str()) {
            return Err(AiError::Api {
                status: 500,
                message: "image backend down".to_string(),
            });
        }
        Ok(ImageResponse {
            created: Some(1),
            data: vec![ImageData {
                b64_json: Some(png_b64()),
                url: None,
                revised_prompt: None,
            }],
        })
    }
}

#[derive(Default)]
struct FakeSpeech {
    texts: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechService for FakeSpeech {
    async fn synthesize(&self, text: &str) -> SpeechResult<AudioStream> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(Box::pin(Cursor::new(b"ID3fake-mp3".to_vec())))
    }
}

#[derive(Clone)]
struct FakeProvider {
    chat: Arc<CannedChat>,
    images: Arc<FakeImages>,
    speech: Arc<FakeSpeech>,
    built: Arc<AtomicBool>,
}

impl FakeProvider {
    fn new(replies: &[&str], failing_image: Option<&str>) -> Self {
        Self {
            chat: Arc::new(CannedChat {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }),
            images: Arc::new(FakeImages {
                failing: failing_image.map(str::to_string),
                requested: Mutex::new(Vec::new()),
            }),
            speech: Arc::new(FakeSpeech::default()),
            built: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl ServiceProvider for FakeProvider {
    fn ai_services(&self, credentials: &Credentials) -> WorkerResult<AiServices> {
        assert_eq!(credentials.openai_token(), "sk-test");
        self.built.store(true, Ordering::SeqCst);
        Ok(AiServices {
            chat: self.chat.clone(),
            images: self.images.clone(),
            chat_model: "gpt-4".to_string(),
        })
    }

    fn speech_service(&self, credentials: &Credentials) -> WorkerResult<Arc<dyn SpeechService>> {
        assert_eq!(credentials.aws_access_id(), "AKIATEST");
        Ok(self.speech.clone())
    }
}

fn full_env() -> HashMap<String, String> {
    [("OAI_KEY", "sk-test"), ("AWS_KEY", "secret"), ("AWS_ID", "AKIATEST")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn config_in(dir: &Path) -> PipelineConfig {
    let template = dir.join("prompt_prompt.txt");
    std::fs::write(&template, TEMPLATE).unwrap();
    PipelineConfig {
        output_dir: dir.join("out"),
        prompt_file: dir.join("prompt.txt"),
        prompt_template_file: template,
        ..Default::default()
    }
}

fn pipeline(
    dir: &Path,
    provider: FakeProvider,
    env: HashMap<String, String>,
) -> Pipeline<FakeProvider> {
    Pipeline::new(config_in(dir), provider)
        .with_script_prompt("Tell me a fake fact")
        .with_credential_lookup(move |name| env.get(name).cloned())
}

fn frame_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|n| n.starts_with("vid_frame"))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_run_caps_frames_at_three() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(
        &[
            r#"{"FakeFact":"A","SignOff":"B"}"#,
            r#"["p1","p2","p3","p4","p5"]"#,
        ],
        None,
    );

    let report = pipeline(dir.path(), provider.clone(), full_env())
        .run()
        .await
        .unwrap();

    let out = dir.path().join("out");
    let mut requested = provider.images.requested.lock().unwrap().clone();
    requested.sort();
    assert_eq!(requested, vec!["p1", "p2", "p3"]);

    assert_eq!(
        frame_files(&out),
        vec!["vid_frame_0.png", "vid_frame_1.png", "vid_frame_2.png"]
    );
    for name in frame_files(&out) {
        let img = image::open(out.join(name)).unwrap();
        assert_eq!((img.width(), img.height()), (2, 2));
    }

    assert_eq!(std::fs::read(out.join("voiceover_a.mp3")).unwrap(), b"ID3fake-mp3");
    assert!(out.join("voiceover_b.mp3").exists());
    assert_eq!(*provider.speech.texts.lock().unwrap(), vec!["A", "B"]);

    let prompts = provider.chat.prompts.lock().unwrap().clone();
    assert_eq!(prompts[0], "Tell me a fake fact");
    assert_eq!(prompts[1], "Describe a frame for each sentence of: A");

    assert_eq!(report.prompt_count, 5);
    assert_eq!(report.skipped_prompts(), 2);
    assert_eq!(report.frame_paths[0], out.join("vid_frame_0.png"));
}

#[tokio::test]
async fn test_wrapped_prompt_object_is_accepted() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(
        &[
            r#"{"FakeFact":"Owls invented jazz.","SignOff":"Stay curious."}"#,
            r#"{"prompts":[{"imagePrompt":"an owl with a trumpet"},{"imagePrompt":"a smoky club"}]}"#,
        ],
        None,
    );

    let report = pipeline(dir.path(), provider.clone(), full_env())
        .run()
        .await
        .unwrap();

    assert_eq!(report.frame_paths.len(), 2);
    assert_eq!(
        frame_files(&dir.path().join("out")),
        vec!["vid_frame_0.png", "vid_frame_1.png"]
    );
}

#[tokio::test]
async fn test_missing_credential_stops_before_any_call() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(&[], None);
    let mut env = full_env();
    env.remove("AWS_KEY");

    let failure = pipeline(dir.path(), provider.clone(), env)
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.stage, PipelineStage::CredentialsResolved);
    match failure.error {
        WorkerError::MissingCredential(name) => assert_eq!(name, "AWS_KEY"),
        other => panic!("expected missing credential, got {other:?}"),
    }
    assert!(!provider.built.load(Ordering::SeqCst));
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn test_malformed_script_fails_before_voice_overs() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(&["Here is your fact: owls"], None);

    let failure = pipeline(dir.path(), provider.clone(), full_env())
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.stage, PipelineStage::ScriptGenerated);
    assert!(matches!(failure.error, WorkerError::MalformedResponse(_)));
    assert!(provider.speech.texts.lock().unwrap().is_empty());
    assert!(!dir.path().join("out").join("voiceover_a.mp3").exists());
}

#[tokio::test]
async fn test_image_failure_leaves_voice_overs_and_no_frames() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(
        &[
            r#"{"FakeFact":"A","SignOff":"B"}"#,
            r#"["p1","p2","p3"]"#,
        ],
        Some("p2"),
    );

    let failure = pipeline(dir.path(), provider, full_env())
        .run()
        .await
        .unwrap_err();

    let out = dir.path().join("out");
    assert_eq!(failure.stage, PipelineStage::FramesGenerated);
    assert!(failure.error.is_upstream());
    assert!(out.join("voiceover_a.mp3").exists());
    assert!(out.join("voiceover_b.mp3").exists());
    assert!(frame_files(&out).is_empty());
}

#[tokio::test]
async fn test_empty_prompt_list_fails_derivation() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(
        &[r#"{"FakeFact":"A","SignOff":"B"}"#, "[]"],
        None,
    );

    let failure = pipeline(dir.path(), provider.clone(), full_env())
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.stage, PipelineStage::ImagePromptsDerived);
    assert!(matches!(failure.error, WorkerError::EmptyPromptSet));
    assert!(provider.images.requested.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_prompt_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(&[], None);

    let env = full_env();
    let failure = Pipeline::new(config_in(dir.path()), provider)
        .with_credential_lookup(move |name| env.get(name).cloned())
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.stage, PipelineStage::ScriptGenerated);
    assert!(matches!(failure.error, WorkerError::ConfigError(_)));
}

#[tokio::test]
async fn test_blank_inline_prompt_is_config_error() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(&[r#"{"FakeFact":"A","SignOff":"B"}"#], None);

    let env = full_env();
    let failure = Pipeline::new(config_in(dir.path()), provider.clone())
        .with_script_prompt("   ")
        .with_credential_lookup(move |name| env.get(name).cloned())
        .run()
        .await
        .unwrap_err();

    assert_eq!(failure.stage, PipelineStage::ScriptGenerated);
    assert!(matches!(failure.error, WorkerError::ConfigError(_)));
    assert!(provider.chat.prompts.lock().unwrap().is_empty());
}
