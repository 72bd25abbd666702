use serde_json::Value;

use crate::{
    parser::{
        parse_caption_tracks, parse_timed_text, playability_status, select_caption_track,
        WatchPage,
    },
    yt::{TranscriptFetcher, TranscriptFragment, VideoId},
};

/// Fetches captions straight from the YouTube watch page
pub struct YouTubeTranscripts {
    client: reqwest::Client,
    languages: Vec<String>,
    watch_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Video is unavailable ({status})")]
    VideoUnavailable { status: String },
    #[error("Transcripts are disabled for this video")]
    TranscriptsDisabled,
    #[error("No transcript found for languages {languages:?}")]
    NoTranscriptFound { languages: Vec<String> },
    #[error(transparent)]
    Parse(#[from] crate::error::Error),
}

impl YouTubeTranscripts {
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            languages,
            watch_url: Self::WATCH_URL.into(),
        }
    }

    /// Points watch page requests at `url` instead of youtube.com
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.watch_url = url.into();
        self
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<WatchPage, TranscriptError> {
        let html = self
            .client
            .get(&self.watch_url)
            .query(&[("v", video_id.as_str())])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(html.into())
    }
}

impl Default for YouTubeTranscripts {
    fn default() -> Self {
        Self::new(vec!["en".into()])
    }
}

impl TranscriptFetcher for YouTubeTranscripts {
    const WATCH_URL: &'static str = "https://www.youtube.com/watch";

    type Error = TranscriptError;

    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptFragment>, Self::Error> {
        let page = self.fetch_watch_page(video_id).await?;
        let player_response = page.player_response::<Value>()?;

        let tracks = parse_caption_tracks(&player_response)?;
        if tracks.is_empty() {
            return match playability_status(&player_response) {
                Some("OK") | None => Err(TranscriptError::TranscriptsDisabled),
                Some(status) => Err(TranscriptError::VideoUnavailable {
                    status: status.to_string(),
                }),
            };
        }

        let track = select_caption_track(&tracks, &self.languages).ok_or_else(|| {
            TranscriptError::NoTranscriptFound {
                languages: self.languages.clone(),
            }
        })?;
        tracing::debug!(
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let xml = self
            .client
            .get(track.base_url.replace("&fmt=srv3", ""))
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch timed text"))?;

        Ok(parse_timed_text(&xml)?)
    }
}
