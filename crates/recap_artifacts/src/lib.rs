//! # Artifacts Module
//!
//! This module turns a piece of text (usually a generated summary) into a
//! downloadable file: synthesized speech, a PDF document or a slide deck.
//!
//! Every render call writes to a freshly created, uniquely named file inside
//! the caller supplied output directory; nothing is ever cleaned up here.

mod artifact;
mod error;
mod pdf;
mod slides;
mod speech;

pub use artifact::{Artifact, ArtifactKind};
pub use error::ArtifactError;
pub use pdf::render_pdf;
pub use slides::{render_slides_from_lines, render_slides_single, SlideDeck, DEFAULT_SLIDE_TITLE};
pub use speech::{render_speech, sanitize_for_speech, SpeechSynthesizer, SPEECH_LANGUAGE};
