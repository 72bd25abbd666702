use recap_artifacts::SpeechSynthesizer;
use reqwest::Client;

/// Longest text the translate endpoint accepts in a single request
const MAX_CHUNK_CHARS: usize = 100;

/// Speech through the public Google Translate TTS endpoint
pub struct GoogleTts {
    client: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Nothing to speak")]
    EmptyText,
}

impl GoogleTts {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://translate.google.com/translate_tts".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        lang: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, TtsError> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", lang),
                ("client", "tw-ob"),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TtsError::Api { status, message });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

impl Default for GoogleTts {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for GoogleTts {
    type Error = TtsError;

    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, Self::Error> {
        let chunks = split_for_speech(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }

        // MP3 frames are self delimiting, consecutive streams play back to back
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, lang, idx, chunks.len()).await?;
            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }
}

/// Splits `text` into pieces of at most `max_chars` characters, breaking at
/// whitespace. A single word longer than `max_chars` is hard split.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();

        while word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            chunks.push(word[..split_at].to_string());
            word = &word[split_at..];
            word_len -= max_chars;
        }

        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
