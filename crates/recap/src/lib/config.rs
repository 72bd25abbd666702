use std::{fmt, path::PathBuf};

/// Runtime settings handed explicitly to the backend clients
#[derive(Clone)]
pub struct Config {
    pub google_api_key: String,
    pub output_dir: PathBuf,
    pub transcript_languages: Vec<String>,
}

impl Config {
    pub fn new(google_api_key: impl Into<String>) -> Self {
        Self {
            google_api_key: google_api_key.into(),
            output_dir: std::env::temp_dir(),
            transcript_languages: vec!["en".into()],
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Ignored when empty, the transcript lookup needs at least one language
    pub fn with_transcript_languages(mut self, languages: Vec<String>) -> Self {
        let languages: Vec<String> = languages
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if !languages.is_empty() {
            self.transcript_languages = languages;
        }
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("google_api_key", &"<redacted>")
            .field("output_dir", &self.output_dir)
            .field("transcript_languages", &self.transcript_languages)
            .finish()
    }
}
