use recap::SpeechSynthesizer;
use std::sync::{Arc, Mutex};

/// Bytes of a (silent) MPEG audio frame header
pub const FAKE_MP3: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00];

#[derive(Clone)]
pub struct MockSpeech {
    /// (text, language) pairs in request order
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    pub fail_with: Option<String>,
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MockSpeech {
    pub fn failing(msg: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl SpeechSynthesizer for MockSpeech {
    type Error = anyhow::Error;

    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), lang.to_string()));
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(FAKE_MP3.to_vec())
    }
}
