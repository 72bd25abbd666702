use std::{
    fmt::{Debug, Display},
    future::Future,
};

use serde::Deserialize;

use crate::error::Error;

pub trait Summarizer {
    const SUMMARIZER_MODEL: &str;

    type Error: Debug + Display;

    /// Sends `prompt` as is and returns the generated text untouched
    fn summarize(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<SummaryResponse, Self::Error>>;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Prepends `instruction` to `text` and makes a single backend call.
///
/// There is no chunking: input longer than the model's context window is
/// rejected by the backend and surfaces as [`Error::Backend`].
#[tracing::instrument(skip_all, fields(model = S::SUMMARIZER_MODEL, text_len = text.len()))]
pub async fn summarize<S: Summarizer>(
    summarizer: &S,
    text: &str,
    instruction: &str,
) -> Result<SummaryResponse, Error> {
    let prompt = format!("{instruction}{text}");

    summarizer
        .summarize(&prompt)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))
        .map_err(|e| Error::Backend(e.to_string()))
}
