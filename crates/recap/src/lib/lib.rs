pub mod config;
mod error;
mod llm;
pub mod parser;
mod processor;
pub mod source;
pub mod tracing;
pub mod tts;
pub mod yt;

pub use config::Config;
pub use error::{Error, Result};
pub use llm::gemini;
pub use llm::{
    prompts::{build_prompt, SummaryStyle, DOCUMENT_SUMMARY_PROMPT},
    summarizer::{summarize, Summarizer, SummaryResponse},
};
pub use processor::{builder::SummaryProcessorBuilder, Summary, SummaryOutcome, SummaryProcessor};
pub use recap_artifacts::{
    render_pdf, render_slides_from_lines, render_slides_single, render_speech, Artifact,
    ArtifactError, ArtifactKind, SpeechSynthesizer,
};
pub use source::{DocumentDecoder, NormalizedText, PdfDecoder, SourceDocument};
