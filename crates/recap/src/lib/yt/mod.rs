pub mod id;
pub mod transcript;

use std::{
    fmt::{Debug, Display},
    future::Future,
};

pub use id::{extract_video_id, VideoId};

/// One caption line as served by the transcript service
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptFragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

pub trait TranscriptFetcher {
    const WATCH_URL: &str;

    type Error: Debug + Display;

    /// Returns the caption fragments of `video_id` in playback order
    fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> impl Future<Output = Result<Vec<TranscriptFragment>, Self::Error>>;
}
