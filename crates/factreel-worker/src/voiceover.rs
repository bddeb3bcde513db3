//! Voice-over synthesis.

use std::path::Path;

use factreel_media::stream_to_file;
use factreel_models::{VideoScript, VoiceOverPaths};
use factreel_speech::SpeechService;
use tracing::{debug, info};

use crate::error::WorkerResult;

/// Synthesize `text` and stream the audio into `path`.
pub async fn synthesize_to_file(
    speech: &dyn SpeechService,
    text: &str,
    path: &Path,
) -> WorkerResult<u64> {
    let mut audio = speech.synthesize(text).await?;

    debug!("Saving voice-over to {}", path.display());
    let written = stream_to_file(&mut audio, path).await?;

    info!("Wrote {} bytes of audio to {}", written, path.display());
    Ok(written)
}

/// Voice the script, then the sign-off, into `paths`.
///
/// The sign-off is not attempted if the script track fails.
pub async fn create_voice_overs(
    speech: &dyn SpeechService,
    script: &VideoScript,
    paths: &VoiceOverPaths,
) -> WorkerResult<()> {
    debug!("Generating voice-over a");
    synthesize_to_file(speech, &script.fact, &paths.script)
        .await
        .map_err(|e| e.context("error when generating script vo"))?;

    debug!("Generating voice-over b");
    synthesize_to_file(speech, &script.sign_off, &paths.sign_off)
        .await
        .map_err(|e| e.context("error when generating signoff vo"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerError;
    use async_trait::async_trait;
    use factreel_speech::{AudioStream, SpeechError, SpeechResult};
    use std::io::Cursor;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::{Context, Poll};
    use tempfile::TempDir;
    use tokio::io::{AsyncRead, ReadBuf};

    #[derive(Default)]
    struct RecordingSpeech {
        fail_on: Option<String>,
        texts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SpeechService for RecordingSpeech {
        async fn synthesize(&self, text: &str) -> SpeechResult<AudioStream> {
            self.texts.lock().unwrap().push(text.to_string());
            if self.fail_on.as_deref() == Some(text) {
                return Err(SpeechError::synthesis_failed("voice unavailable"));
            }
            Ok(Box::pin(Cursor::new(format!("mp3:{}", text).into_bytes())))
        }
    }

    #[tokio::test]
    async fn test_creates_both_tracks_in_order() {
        let dir = TempDir::new().unwrap();
        let speech = RecordingSpeech::default();
        let paths = VoiceOverPaths::in_dir(dir.path());

        create_voice_overs(&speech, &VideoScript::new("fact", "bye"), &paths)
            .await
            .unwrap();

        assert_eq!(*speech.texts.lock().unwrap(), vec!["fact", "bye"]);
        assert_eq!(std::fs::read(&paths.script).unwrap(), b"mp3:fact");
        assert_eq!(std::fs::read(&paths.sign_off).unwrap(), b"mp3:bye");
    }

    #[tokio::test]
    async fn test_script_failure_skips_sign_off() {
        let dir = TempDir::new().unwrap();
        let speech = RecordingSpeech {
            fail_on: Some("fact".to_string()),
            ..Default::default()
        };
        let paths = VoiceOverPaths::in_dir(dir.path());

        let err = create_voice_overs(&speech, &VideoScript::new("fact", "bye"), &paths)
            .await
            .unwrap_err();

        assert!(err.is_upstream());
        assert!(err.to_string().contains("script vo"));
        assert_eq!(*speech.texts.lock().unwrap(), vec!["fact"]);
        assert!(!paths.sign_off.exists());
    }

    #[tokio::test]
    async fn test_unwritable_destination_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let speech = RecordingSpeech::default();
        let paths = VoiceOverPaths::in_dir(&blocker);

        let err = create_voice_overs(&speech, &VideoScript::new("fact", "bye"), &paths)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::Persistence(_)));
    }

    /// Audio body that drops after the first chunk.
    struct ResetAudio {
        sent: bool,
    }

    impl AsyncRead for ResetAudio {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            if !self.sent {
                self.sent = true;
                buf.put_slice(b"ID3partial");
                return Poll::Ready(Ok(()));
            }
            Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )))
        }
    }

    struct DroppingSpeech;

    #[async_trait]
    impl SpeechService for DroppingSpeech {
        async fn synthesize(&self, _text: &str) -> SpeechResult<AudioStream> {
            Ok(Box::pin(ResetAudio { sent: false }))
        }
    }

    #[tokio::test]
    async fn test_broken_audio_stream_is_upstream_error() {
        let dir = TempDir::new().unwrap();
        let paths = VoiceOverPaths::in_dir(dir.path());

        let err = create_voice_overs(&DroppingSpeech, &VideoScript::new("fact", "bye"), &paths)
            .await
            .unwrap_err();

        assert!(err.is_upstream(), "got {err:?}");
        assert!(err.to_string().contains("script vo"));
        assert!(!paths.sign_off.exists());
    }
}
