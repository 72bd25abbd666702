use recap::yt::{TranscriptFetcher, TranscriptFragment, VideoId};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockTranscripts {
    pub fragments: Vec<TranscriptFragment>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockTranscripts {
    pub fn new(lines: &[&str]) -> Self {
        let fragments = lines
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptFragment {
                text: text.to_string(),
                start: i as f64 * 2.5,
                duration: 2.5,
            })
            .collect();

        Self {
            fragments,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fragments: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl TranscriptFetcher for MockTranscripts {
    const WATCH_URL: &'static str = "https://youtube.test/watch";
    type Error = anyhow::Error;

    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptFragment>, Self::Error> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.fragments.clone())
    }
}
