use recap_artifacts::ArtifactError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid YouTube URL format")]
    InvalidFormat,
    #[error("Transcript unavailable for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },
    #[error("Invalid summarization style: {0:?}")]
    InvalidStyle(String),
    #[error("Summarization backend error: {0}")]
    Backend(String),
    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),
    #[error("No summary yet, summarize a video or document first")]
    NoSummary,
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

pub type Result<T> = std::result::Result<T, Error>;
