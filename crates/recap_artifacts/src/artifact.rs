use std::{
    fmt,
    fs::File,
    io,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Speech,
    Pdf,
    SlideDeck,
}

impl ArtifactKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ArtifactKind::Speech => "audio/mpeg",
            ArtifactKind::Pdf => "application/pdf",
            ArtifactKind::SlideDeck => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Speech => "mp3",
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::SlideDeck => "pptx",
        }
    }

    /// Name offered to the user when the artifact is downloaded
    pub fn download_name(&self) -> &'static str {
        match self {
            ArtifactKind::Speech => "summary.mp3",
            ArtifactKind::Pdf => "chat_to_pdf.pdf",
            ArtifactKind::SlideDeck => "generated_ppt.pptx",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Speech => "speech audio",
            ArtifactKind::Pdf => "PDF",
            ArtifactKind::SlideDeck => "slide deck",
        };
        f.write_str(name)
    }
}

/// A rendered file handed back to the caller for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

impl Artifact {
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    pub fn file_name(&self) -> &'static str {
        self.kind.download_name()
    }

    /// Reads the rendered bytes back, e.g. to stream them to a client
    pub async fn bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Creates an empty, uniquely named file for `kind` inside `out_dir`.
/// The file is persisted: dropping the handle does not delete it.
pub(crate) fn create_artifact_file(
    out_dir: &Path,
    kind: ArtifactKind,
) -> io::Result<(File, Artifact)> {
    std::fs::create_dir_all(out_dir)?;

    let (file, path) = tempfile::Builder::new()
        .prefix("recap-")
        .suffix(&format!(".{}", kind.extension()))
        .tempfile_in(out_dir)?
        .keep()
        .map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), %kind, "Created artifact file");

    Ok((file, Artifact { path, kind }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(ArtifactKind::Speech.mime_type(), "audio/mpeg");
        assert_eq!(ArtifactKind::Pdf.mime_type(), "application/pdf");
        assert_eq!(
            ArtifactKind::SlideDeck.mime_type(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
    }

    #[test]
    fn test_artifact_files_are_unique_and_kept() {
        let dir = tempfile::tempdir().unwrap();

        let (first_file, first) = create_artifact_file(dir.path(), ArtifactKind::Pdf).unwrap();
        let (second_file, second) = create_artifact_file(dir.path(), ArtifactKind::Pdf).unwrap();
        drop(first_file);
        drop(second_file);

        assert_ne!(first.path, second.path);
        assert!(first.path.exists(), "artifact should survive its handle");
        assert_eq!(
            first.path.extension().and_then(|e| e.to_str()),
            Some("pdf")
        );
    }

    #[test]
    fn test_missing_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("out");

        let (_file, artifact) = create_artifact_file(&nested, ArtifactKind::Speech).unwrap();
        assert!(artifact.path.starts_with(&nested));
    }
}
