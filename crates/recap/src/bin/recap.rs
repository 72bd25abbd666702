use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use recap::{
    gemini::GeminiClient, tracing::init_tracing_subscriber, tts::GoogleTts,
    yt::{extract_video_id, transcript::YouTubeTranscripts},
    Artifact, Config, PdfDecoder, SourceDocument, SummaryOutcome, SummaryProcessor,
    SummaryProcessorBuilder, SummaryStyle,
};

#[derive(Parser)]
#[command(
    name = "recap",
    about = "Summarize YouTube videos and PDF documents, export the result as audio, PDF or slides"
)]
struct Cli {
    /// Google Generative Language API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: Option<String>,

    /// Directory generated files are written to [default: system temp dir]
    #[arg(long, env = "RECAP_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Preferred transcript languages, most preferred first
    #[arg(
        long,
        env = "RECAP_TRANSCRIPT_LANGS",
        value_delimiter = ',',
        default_value = "en"
    )]
    transcript_langs: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize the transcript of a YouTube video
    Video {
        /// Link to the video
        url: String,

        /// One of "Bullet Points", "Detailed Paragraph", "Short Summary", "Key Highlights"
        #[arg(long, default_value = "Bullet Points")]
        style: SummaryStyle,

        #[command(flatten)]
        exports: Exports,
    },
    /// Summarize a PDF document
    Pdf {
        file: PathBuf,

        /// Print the extracted text before summarizing
        #[arg(long)]
        show_text: bool,

        #[command(flatten)]
        exports: Exports,
    },
    /// Summarize free-form text
    Text {
        #[command(flatten)]
        input: TextInput,

        #[arg(long, default_value = "Bullet Points")]
        style: SummaryStyle,

        #[command(flatten)]
        exports: Exports,
    },
    /// Write text to a PDF file
    ToPdf {
        #[command(flatten)]
        input: TextInput,
    },
    /// Build a slide deck
    Slides {
        #[arg(long, requires = "content", conflicts_with = "from_file")]
        title: Option<String>,

        #[arg(long, requires = "title")]
        content: Option<String>,

        /// One slide per non-blank line of the file
        #[arg(long, required_unless_present = "title")]
        from_file: Option<PathBuf>,
    },
    /// Speak text into an MP3 file
    Speak { text: String },
}

#[derive(Args)]
struct Exports {
    /// Render the summary as speech
    #[arg(long)]
    listen: bool,

    /// Render the summary as a PDF
    #[arg(long)]
    pdf: bool,

    /// Render the summary as a slide deck, one slide per line
    #[arg(long)]
    slides: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct TextInput {
    text: Option<String>,

    /// Read the text from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

impl TextInput {
    async fn read(self) -> anyhow::Result<String> {
        match (self.text, self.file) {
            (Some(text), _) => Ok(text),
            (None, Some(path)) => read_to_string(&path).await,
            (None, None) => anyhow::bail!("Either text or --file is required"),
        }
    }
}

type Processor = SummaryProcessor<YouTubeTranscripts, GeminiClient, PdfDecoder, GoogleTts>;

fn build_processor(config: &Config) -> Processor {
    SummaryProcessorBuilder::new(&config.output_dir)
        .transcripts(YouTubeTranscripts::new(config.transcript_languages.clone()))
        .summarizer(GeminiClient::new(&config.google_api_key))
        .decoder(PdfDecoder)
        .speech(GoogleTts::default())
        .build()
}

async fn read_to_string(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn print_artifact(artifact: &Artifact) {
    println!(
        "{} [{}]: {}",
        artifact.file_name(),
        artifact.mime_type(),
        artifact.path.display()
    );
}

/// Prints the outcome and renders the requested exports from the cached summary
async fn finish(
    processor: &Processor,
    outcome: SummaryOutcome,
    exports: &Exports,
) -> anyhow::Result<()> {
    let summary = match outcome {
        SummaryOutcome::Summarized(summary) => summary,
        SummaryOutcome::NothingToSummarize => {
            eprintln!("warning: no text found, nothing to summarize");
            return Ok(());
        }
    };

    println!("{summary}");

    if exports.listen {
        print_artifact(&processor.speak_summary().await?);
    }
    if exports.pdf {
        print_artifact(&processor.export_summary_pdf()?);
    }
    if exports.slides {
        print_artifact(&processor.export_summary_slides()?);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_dir = cli.output_dir.unwrap_or_else(std::env::temp_dir);
    let config = || -> anyhow::Result<Config> {
        let key = cli
            .google_api_key
            .clone()
            .context("GOOGLE_API_KEY is not set")?;
        Ok(Config::new(key)
            .with_output_dir(&output_dir)
            .with_transcript_languages(cli.transcript_langs.clone()))
    };

    match cli.command {
        Command::Video {
            url,
            style,
            exports,
        } => {
            let video_id = extract_video_id(&url)?;
            println!("Thumbnail: {}", video_id.thumbnail_url());

            let mut processor = build_processor(&config()?);
            let outcome = processor.summarize_video(&url, style).await?;
            finish(&processor, outcome, &exports).await?;
        }
        Command::Pdf {
            file,
            show_text,
            exports,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let mut processor = build_processor(&config()?);
            if show_text {
                let text = processor
                    .extract_text(&SourceDocument::UploadedDocument(bytes.clone()))
                    .await?;
                println!("{}\n", &*text);
            }
            let outcome = processor.summarize_document(&bytes).await?;
            finish(&processor, outcome, &exports).await?;
        }
        Command::Text {
            input,
            style,
            exports,
        } => {
            let text = input.read().await?;

            let mut processor = build_processor(&config()?);
            let outcome = processor.summarize_text(&text, style).await?;
            finish(&processor, outcome, &exports).await?;
        }
        Command::ToPdf { input } => {
            let text = input.read().await?;
            print_artifact(&recap::render_pdf(&text, &output_dir)?);
        }
        Command::Slides {
            title,
            content,
            from_file,
        } => {
            let artifact = match (title, content, from_file) {
                (Some(title), Some(content), _) => {
                    recap::render_slides_single(&title, &content, &output_dir)?
                }
                (_, _, Some(path)) => {
                    let text = read_to_string(&path).await?;
                    recap::render_slides_from_lines(text.lines(), &output_dir)?
                }
                _ => anyhow::bail!("Either --title and --content or --from-file is required"),
            };
            print_artifact(&artifact);
        }
        Command::Speak { text } => {
            let artifact = recap::render_speech(&GoogleTts::default(), &text, &output_dir).await?;
            print_artifact(&artifact);
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match run(cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = ?e, "Command failed");
            eprintln!("error: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}
