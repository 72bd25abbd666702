use std::{fmt::Display, future::Future, path::Path};

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{artifact::create_artifact_file, Artifact, ArtifactError, ArtifactKind};

/// Language code every synthesis request is made with
pub const SPEECH_LANGUAGE: &str = "en";

pub trait SpeechSynthesizer {
    type Error: Display;

    /// Returns an MP3 byte stream for `text` spoken in `lang`
    fn synthesize(
        &self,
        text: &str,
        lang: &str,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>>;
}

/// Strips everything a speech backend could choke on.
///
/// Keeps ASCII letters and digits plus `, . ! ? '`. Any whitespace becomes a
/// plain space; every other character (markup, emoji, control codes, other
/// punctuation) is dropped.
pub fn sanitize_for_speech(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() => Some(c),
            ',' | '.' | '!' | '?' | '\'' => Some(c),
            c if c.is_whitespace() => Some(' '),
            _ => None,
        })
        .collect()
}

/// Sanitizes `text`, synthesizes it and stores the audio in a new `.mp3`
/// file under `out_dir`.
#[tracing::instrument(skip(synthesizer, text), fields(text_len = text.len()))]
pub async fn render_speech<S: SpeechSynthesizer>(
    synthesizer: &S,
    text: &str,
    out_dir: &Path,
) -> Result<Artifact, ArtifactError> {
    let clean_text = sanitize_for_speech(text);

    let audio = synthesizer
        .synthesize(&clean_text, SPEECH_LANGUAGE)
        .await
        .map_err(|e| ArtifactError::SpeechBackend(e.to_string()))
        .inspect_err(|e| tracing::error!(error = %e, "Failed to synthesize speech"))?;

    let (file, artifact) = create_artifact_file(out_dir, ArtifactKind::Speech)
        .map_err(|e| ArtifactError::SpeechBackend(e.to_string()))?;

    write_audio(tokio::fs::File::from_std(file), &audio, &artifact).await?;

    tracing::info!(path = %artifact.path.display(), bytes = audio.len(), "Speech rendered");

    Ok(artifact)
}

/// Writes `audio` to the artifact's file, removing the file again if the
/// write does not complete
async fn write_audio<W: AsyncWrite + Unpin>(
    mut writer: W,
    audio: &[u8],
    artifact: &Artifact,
) -> Result<(), ArtifactError> {
    let written = match writer.write_all(audio).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        tracing::error!(error = %e, path = %artifact.path.display(), "Failed to write audio file");
        drop(writer);
        if let Err(remove_err) = tokio::fs::remove_file(&artifact.path).await {
            tracing::warn!(error = %remove_err, "Failed to remove partial audio file");
        }
        return Err(ArtifactError::SpeechBackend(e.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        pin::Pin,
        sync::Mutex,
        task::{Context, Poll},
    };

    use super::*;

    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::other("no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    struct RecordingSynthesizer {
        requests: Mutex<Vec<(String, String)>>,
        fail_with: Option<&'static str>,
    }

    impl RecordingSynthesizer {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }
    }

    impl SpeechSynthesizer for RecordingSynthesizer {
        type Error = String;

        async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, Self::Error> {
            self.requests
                .lock()
                .unwrap()
                .push((text.to_string(), lang.to_string()));
            match self.fail_with {
                Some(msg) => Err(msg.to_string()),
                None => Ok(b"ID3fake-mp3".to_vec()),
            }
        }
    }

    #[test]
    fn test_sanitize_drops_disallowed_punctuation() {
        assert_eq!(sanitize_for_speech("Hello; world? (ok)"), "Hello world? ok");
    }

    #[test]
    fn test_sanitize_keeps_allowed_set() {
        let text = "It's 5 o'clock, really! Isn't it? Yes.";
        assert_eq!(sanitize_for_speech(text), text);
    }

    #[test]
    fn test_sanitize_strips_markup_emoji_and_control_chars() {
        let text = "**Bold** <b>tag</b> 🚀 done\u{7}\t#1 café_\nnext";
        let clean = sanitize_for_speech(text);

        assert!(
            clean
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || " ,.!?'".contains(c)),
            "unexpected character in {clean:?}"
        );
        assert_eq!(clean, "Bold btagb  done 1 caf next");
    }

    #[tokio::test]
    async fn test_render_speech_forwards_sanitized_text_and_writes_mp3() {
        let dir = tempfile::tempdir().unwrap();
        let synthesizer = RecordingSynthesizer::new();

        let artifact = render_speech(&synthesizer, "Hello; world? (ok)", dir.path())
            .await
            .expect("speech should render");

        let requests = synthesizer.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            &[("Hello world? ok".to_string(), "en".to_string())]
        );
        assert_eq!(artifact.kind, ArtifactKind::Speech);
        assert_eq!(artifact.mime_type(), "audio/mpeg");
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"ID3fake-mp3");
    }

    #[tokio::test]
    async fn test_render_speech_backend_failure() {
        let dir = tempfile::tempdir().unwrap();
        let synthesizer = RecordingSynthesizer {
            fail_with: Some("tts unavailable"),
            ..RecordingSynthesizer::new()
        };

        let result = render_speech(&synthesizer, "hello", dir.path()).await;
        assert!(matches!(result, Err(ArtifactError::SpeechBackend(ref m)) if m == "tts unavailable"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_write_removes_audio_file() {
        let dir = tempfile::tempdir().unwrap();
        let (_file, artifact) = create_artifact_file(dir.path(), ArtifactKind::Speech).unwrap();
        assert!(artifact.path.exists());

        let result = write_audio(FullDisk, b"ID3fake-mp3", &artifact).await;

        assert!(matches!(result, Err(ArtifactError::SpeechBackend(ref m)) if m.contains("no space")));
        assert!(!artifact.path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
