use std::path::PathBuf;

use recap_artifacts::SpeechSynthesizer;

use crate::{
    source::DocumentDecoder, yt::TranscriptFetcher, Summarizer, SummaryProcessor,
};

pub struct SummaryProcessorBuilder<T = (), S = (), D = (), V = ()> {
    output_dir: PathBuf,
    transcripts: T,
    summarizer: S,
    decoder: D,
    speech: V,
}

impl SummaryProcessorBuilder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            transcripts: (),
            summarizer: (),
            decoder: (),
            speech: (),
        }
    }
}

impl<T, S, D, V> SummaryProcessorBuilder<T, S, D, V> {
    pub fn transcripts<T2: TranscriptFetcher>(
        self,
        transcripts: T2,
    ) -> SummaryProcessorBuilder<T2, S, D, V> {
        SummaryProcessorBuilder {
            output_dir: self.output_dir,
            transcripts,
            summarizer: self.summarizer,
            decoder: self.decoder,
            speech: self.speech,
        }
    }

    pub fn summarizer<S2: Summarizer>(self, summarizer: S2) -> SummaryProcessorBuilder<T, S2, D, V> {
        SummaryProcessorBuilder {
            output_dir: self.output_dir,
            transcripts: self.transcripts,
            summarizer,
            decoder: self.decoder,
            speech: self.speech,
        }
    }

    pub fn decoder<D2: DocumentDecoder>(self, decoder: D2) -> SummaryProcessorBuilder<T, S, D2, V> {
        SummaryProcessorBuilder {
            output_dir: self.output_dir,
            transcripts: self.transcripts,
            summarizer: self.summarizer,
            decoder,
            speech: self.speech,
        }
    }

    pub fn speech<V2: SpeechSynthesizer>(self, speech: V2) -> SummaryProcessorBuilder<T, S, D, V2> {
        SummaryProcessorBuilder {
            output_dir: self.output_dir,
            transcripts: self.transcripts,
            summarizer: self.summarizer,
            decoder: self.decoder,
            speech,
        }
    }
}

impl<T, S, D, V> SummaryProcessorBuilder<T, S, D, V>
where
    T: TranscriptFetcher,
    S: Summarizer,
    D: DocumentDecoder,
    V: SpeechSynthesizer,
{
    pub fn build(self) -> SummaryProcessor<T, S, D, V> {
        SummaryProcessor {
            output_dir: self.output_dir,
            transcripts: self.transcripts,
            summarizer: self.summarizer,
            decoder: self.decoder,
            speech: self.speech,
            summary: None,
        }
    }
}
