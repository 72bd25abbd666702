pub mod decoder;
pub mod speech;
pub mod summarizer;
pub mod transcripts;
