use crate::ArtifactKind;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Speech backend error: {0}")]
    SpeechBackend(String),
    #[error("Failed to render {kind}: {reason}")]
    Render { kind: ArtifactKind, reason: String },
}

impl ArtifactError {
    pub(crate) fn render(kind: ArtifactKind, reason: impl ToString) -> Self {
        ArtifactError::Render {
            kind,
            reason: reason.to_string(),
        }
    }
}
