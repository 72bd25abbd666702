pub mod builder;

use std::{fmt, ops::Deref, path::PathBuf};

use recap_artifacts::{Artifact, SpeechSynthesizer};

use crate::{
    error::Error,
    llm::{
        prompts::{build_prompt, SummaryStyle, DOCUMENT_SUMMARY_PROMPT},
        summarizer::{summarize, Summarizer},
    },
    source::{read_document, read_transcript, DocumentDecoder, NormalizedText, SourceDocument},
    yt::{extract_video_id, TranscriptFetcher},
};

/// Text produced by the summarization backend, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary(String);

impl Deref for Summary {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Summarized(Summary),
    /// The source had no text; nothing was sent to the backend
    NothingToSummarize,
}

// Drives a single interaction: source -> text -> summary -> artifacts
pub struct SummaryProcessor<T, S, D, V>
where
    T: TranscriptFetcher,
    S: Summarizer,
    D: DocumentDecoder,
    V: SpeechSynthesizer,
{
    output_dir: PathBuf,
    transcripts: T,
    summarizer: S,
    decoder: D,
    speech: V,
    summary: Option<Summary>,
}

impl<T, S, D, V> SummaryProcessor<T, S, D, V>
where
    T: TranscriptFetcher,
    S: Summarizer,
    D: DocumentDecoder,
    V: SpeechSynthesizer,
{
    /// Summarizes the transcript of the video `reference` points at
    #[tracing::instrument(skip(self))]
    pub async fn summarize_video(
        &mut self,
        reference: &str,
        style: SummaryStyle,
    ) -> Result<SummaryOutcome, Error> {
        let video_id = extract_video_id(reference)?;
        let text = read_transcript(&self.transcripts, &video_id).await?;

        self.summarize_normalized(text, build_prompt(style)).await
    }

    /// Summarizes an uploaded PDF with the fixed document instruction
    #[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
    pub async fn summarize_document(&mut self, bytes: &[u8]) -> Result<SummaryOutcome, Error> {
        let text = read_document(&self.decoder, bytes)?;

        self.summarize_normalized(text, DOCUMENT_SUMMARY_PROMPT)
            .await
    }

    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn summarize_text(
        &mut self,
        text: &str,
        style: SummaryStyle,
    ) -> Result<SummaryOutcome, Error> {
        self.summarize_normalized(NormalizedText::new(text), build_prompt(style))
            .await
    }

    pub async fn extract_text(&self, source: &SourceDocument) -> Result<NormalizedText, Error> {
        match source {
            SourceDocument::VideoTranscript(video_id) => {
                read_transcript(&self.transcripts, video_id).await
            }
            SourceDocument::UploadedDocument(bytes) => read_document(&self.decoder, bytes),
            SourceDocument::Text(text) => Ok(NormalizedText::new(text.as_str())),
        }
    }

    /// The summary of the latest successful summarization, if any
    pub fn cached_summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub async fn speak_summary(&self) -> Result<Artifact, Error> {
        let summary = self.require_summary()?;
        self.render_speech(summary).await
    }

    pub fn export_summary_pdf(&self) -> Result<Artifact, Error> {
        let summary = self.require_summary()?;
        self.render_pdf(summary)
    }

    /// One slide per non-blank line of the cached summary
    pub fn export_summary_slides(&self) -> Result<Artifact, Error> {
        let summary = self.require_summary()?;
        self.render_slides_from_lines(summary)
    }

    pub async fn render_speech(&self, text: &str) -> Result<Artifact, Error> {
        Ok(recap_artifacts::render_speech(&self.speech, text, &self.output_dir).await?)
    }

    pub fn render_pdf(&self, text: &str) -> Result<Artifact, Error> {
        Ok(recap_artifacts::render_pdf(text, &self.output_dir)?)
    }

    pub fn render_slides(&self, title: &str, body: &str) -> Result<Artifact, Error> {
        Ok(recap_artifacts::render_slides_single(
            title,
            body,
            &self.output_dir,
        )?)
    }

    pub fn render_slides_from_lines(&self, text: &str) -> Result<Artifact, Error> {
        Ok(recap_artifacts::render_slides_from_lines(
            text.lines(),
            &self.output_dir,
        )?)
    }

    fn require_summary(&self) -> Result<&str, Error> {
        self.summary
            .as_deref()
            .ok_or(Error::NoSummary)
            .inspect_err(|_| tracing::warn!("No cached summary to render"))
    }

    async fn summarize_normalized(
        &mut self,
        text: NormalizedText,
        instruction: &str,
    ) -> Result<SummaryOutcome, Error> {
        if text.is_blank() {
            tracing::warn!("No text found, nothing to summarize");
            return Ok(SummaryOutcome::NothingToSummarize);
        }

        let response = summarize(&self.summarizer, &text, instruction).await?;
        let summary = Summary(response.summary);

        tracing::info!(summary_len = summary.len(), "Summary ready");
        self.summary = Some(summary.clone());

        Ok(SummaryOutcome::Summarized(summary))
    }
}
