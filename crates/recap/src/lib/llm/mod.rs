pub mod gemini;
pub mod prompts;
pub mod summarizer;
