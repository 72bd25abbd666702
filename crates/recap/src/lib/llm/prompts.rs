use std::{fmt, str::FromStr};

use crate::error::Error;

/// Instruction used when summarizing an uploaded document
pub const DOCUMENT_SUMMARY_PROMPT: &str = include_str!("./prompts/document_0.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryStyle {
    BulletPoints,
    DetailedParagraph,
    ShortSummary,
    KeyHighlights,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 4] = [
        SummaryStyle::BulletPoints,
        SummaryStyle::DetailedParagraph,
        SummaryStyle::ShortSummary,
        SummaryStyle::KeyHighlights,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SummaryStyle::BulletPoints => "Bullet Points",
            SummaryStyle::DetailedParagraph => "Detailed Paragraph",
            SummaryStyle::ShortSummary => "Short Summary",
            SummaryStyle::KeyHighlights => "Key Highlights",
        }
    }

    /// Word ceiling the model is asked to stay under. Advisory only.
    pub fn word_limit(&self) -> u32 {
        match self {
            SummaryStyle::BulletPoints | SummaryStyle::DetailedParagraph => 250,
            SummaryStyle::ShortSummary => 100,
            SummaryStyle::KeyHighlights => 150,
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SummaryStyle {
    type Err = Error;

    /// Accepts the display labels ("Short Summary") as well as their
    /// kebab/snake forms ("short-summary"), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        SummaryStyle::ALL
            .into_iter()
            .find(|style| style.label().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| Error::InvalidStyle(s.to_string()))
    }
}

pub fn build_prompt(style: SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::BulletPoints => {
            "Summarize the video in clear bullet points (max 250 words): "
        }
        SummaryStyle::DetailedParagraph => {
            "Provide a detailed paragraph summarizing the video (max 250 words): "
        }
        SummaryStyle::ShortSummary => "Summarize the video briefly (max 100 words): ",
        SummaryStyle::KeyHighlights => {
            "Highlight key points and action items from the video (max 150 words): "
        }
    }
}
