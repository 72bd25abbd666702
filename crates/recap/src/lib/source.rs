use std::{
    fmt::{Debug, Display},
    ops::Deref,
};

use itertools::Itertools;

use crate::{
    error::Error,
    yt::{TranscriptFetcher, VideoId},
};

/// Anything the pipeline can pull text out of
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDocument {
    VideoTranscript(VideoId),
    UploadedDocument(Vec<u8>),
    Text(String),
}

/// The text handed to the summarizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        NormalizedText(text.into())
    }

    /// True when there is nothing worth summarizing
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub trait DocumentDecoder {
    type Error: Debug + Display;

    /// Returns the text of every page, in page order
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error>;
}

/// PDF text extraction backed by `pdf-extract`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfDecoder;

impl DocumentDecoder for PdfDecoder {
    type Error = pdf_extract::OutputError;

    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<String>, Self::Error> {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }
}

/// Fetches the transcript of `video_id` and joins the fragments with single
/// spaces, in the order the service returned them.
#[tracing::instrument(skip(fetcher))]
pub async fn read_transcript<T: TranscriptFetcher>(
    fetcher: &T,
    video_id: &VideoId,
) -> Result<NormalizedText, Error> {
    let fragments = fetcher
        .fetch_transcript(video_id)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch transcript"))
        .map_err(|e| Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason: e.to_string(),
        })?;

    tracing::debug!(fragments = fragments.len(), "Fetched transcript");

    Ok(NormalizedText(
        fragments.iter().map(|f| f.text.as_str()).join(" "),
    ))
}

/// Concatenates the page texts of a document without separators. A document
/// without extractable text yields an empty string.
#[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
pub fn read_document<D: DocumentDecoder>(
    decoder: &D,
    bytes: &[u8],
) -> Result<NormalizedText, Error> {
    let pages = decoder
        .page_texts(bytes)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to decode document"))
        .map_err(|e| Error::UnreadableDocument(e.to_string()))?;

    tracing::debug!(pages = pages.len(), "Decoded document");

    Ok(NormalizedText(pages.concat()))
}
