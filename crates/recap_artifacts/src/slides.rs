use std::{
    io::{Seek, Write},
    path::Path,
};

use quick_xml::escape::escape;
use zip::{result::ZipResult, write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::{artifact::create_artifact_file, Artifact, ArtifactError, ArtifactKind};

/// Title given to every slide built from a line of text
pub const DEFAULT_SLIDE_TITLE: &str = "Slide";

const ROOT_RELS: &str = include_str!("./slides/package/root.rels");
const SLIDE_MASTER: &str = include_str!("./slides/package/slideMaster1.xml");
const SLIDE_MASTER_RELS: &str = include_str!("./slides/package/slideMaster1.xml.rels");
const SLIDE_LAYOUT: &str = include_str!("./slides/package/slideLayout1.xml");
const SLIDE_LAYOUT_RELS: &str = include_str!("./slides/package/slideLayout1.xml.rels");
const THEME: &str = include_str!("./slides/package/theme1.xml");

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_DECLS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_TYPE_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CONTENT_TYPE_BASE: &str = "application/vnd.openxmlformats-officedocument";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slide {
    title: String,
    body: String,
}

/// An in-memory presentation where every slide uses the
/// "Title and Content" layout.
#[derive(Debug, Clone, Default)]
pub struct SlideDeck {
    slides: Vec<Slide>,
}

impl SlideDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_slide(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.slides.push(Slide {
            title: title.into(),
            body: body.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Writes the deck as a `.pptx` package
    pub fn write<W: Write + Seek>(&self, writer: W) -> ZipResult<W> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let part = |zip: &mut ZipWriter<W>, name: String, content: &str| -> ZipResult<()> {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        part(&mut zip, "[Content_Types].xml".into(), &self.content_types())?;
        part(&mut zip, "_rels/.rels".into(), ROOT_RELS)?;
        part(&mut zip, "ppt/presentation.xml".into(), &self.presentation())?;
        part(
            &mut zip,
            "ppt/_rels/presentation.xml.rels".into(),
            &self.presentation_rels(),
        )?;
        part(&mut zip, "ppt/slideMasters/slideMaster1.xml".into(), SLIDE_MASTER)?;
        part(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
            SLIDE_MASTER_RELS,
        )?;
        part(&mut zip, "ppt/slideLayouts/slideLayout1.xml".into(), SLIDE_LAYOUT)?;
        part(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
            SLIDE_LAYOUT_RELS,
        )?;
        part(&mut zip, "ppt/theme/theme1.xml".into(), THEME)?;

        for (idx, slide) in self.slides.iter().enumerate() {
            let number = idx + 1;
            part(
                &mut zip,
                format!("ppt/slides/slide{number}.xml"),
                &slide_xml(slide),
            )?;
            part(
                &mut zip,
                format!("ppt/slides/_rels/slide{number}.xml.rels"),
                &slide_rels(),
            )?;
        }

        zip.finish()
    }

    fn content_types(&self) -> String {
        let slides: String = (1..=self.slides.len())
            .map(|n| {
                format!(
                    r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CONTENT_TYPE_BASE}.presentationml.slide+xml"/>"#
                )
            })
            .collect();

        format!(
            r#"{XML_HEADER}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="{CONTENT_TYPE_BASE}.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{CONTENT_TYPE_BASE}.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="{CONTENT_TYPE_BASE}.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="{CONTENT_TYPE_BASE}.theme+xml"/>{slides}</Types>"#
        )
    }

    fn presentation(&self) -> String {
        // rId1 and rId2 belong to the master and the theme
        let slide_ids = if self.slides.is_empty() {
            String::new()
        } else {
            let ids: String = (1..=self.slides.len())
                .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 2))
                .collect();
            format!("<p:sldIdLst>{ids}</p:sldIdLst>")
        };

        format!(
            r#"{XML_HEADER}
<p:presentation {NS_DECLS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{slide_ids}<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
        )
    }

    fn presentation_rels(&self) -> String {
        let slides: String = (1..=self.slides.len())
            .map(|n| {
                format!(
                    r#"<Relationship Id="rId{}" Type="{REL_TYPE_BASE}/slide" Target="slides/slide{n}.xml"/>"#,
                    n + 2
                )
            })
            .collect();

        format!(
            r#"{XML_HEADER}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_TYPE_BASE}/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{REL_TYPE_BASE}/theme" Target="theme/theme1.xml"/>{slides}</Relationships>"#
        )
    }
}

fn slide_rels() -> String {
    format!(
        r#"{XML_HEADER}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_TYPE_BASE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#
    )
}

fn slide_xml(slide: &Slide) -> String {
    let title = paragraphs(&slide.title);
    let body = paragraphs(&slide.body);

    format!(
        r#"{XML_HEADER}
<p:sld {NS_DECLS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{title}</p:txBody></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

/// One `<a:p>` per line of `text`
fn paragraphs(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let line: String = line
                .trim_end_matches('\r')
                .chars()
                .filter(|c| !c.is_control() || *c == '\t')
                .collect();
            if line.is_empty() {
                "<a:p/>".to_string()
            } else {
                format!(
                    r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                    escape(line.as_str())
                )
            }
        })
        .collect()
}

fn save_deck(deck: &SlideDeck, out_dir: &Path) -> Result<Artifact, ArtifactError> {
    let kind = ArtifactKind::SlideDeck;

    let (file, artifact) =
        create_artifact_file(out_dir, kind).map_err(|e| ArtifactError::render(kind, e))?;

    deck.write(file)
        .map_err(|e| ArtifactError::render(kind, e))
        .inspect_err(|e| tracing::error!(error = %e, "Failed to write slide deck"))?;

    tracing::info!(path = %artifact.path.display(), slides = deck.len(), "Slide deck rendered");

    Ok(artifact)
}

/// Renders a one slide deck with `title` and `body` placed verbatim
#[tracing::instrument(skip(body))]
pub fn render_slides_single(
    title: &str,
    body: &str,
    out_dir: &Path,
) -> Result<Artifact, ArtifactError> {
    let mut deck = SlideDeck::new();
    deck.add_slide(title, body);
    save_deck(&deck, out_dir)
}

/// Renders one slide per non-blank line, in order. Blank lines are skipped
/// and do not produce empty slides.
#[tracing::instrument(skip(lines))]
pub fn render_slides_from_lines<I, S>(lines: I, out_dir: &Path) -> Result<Artifact, ArtifactError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut deck = SlideDeck::new();
    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        deck.add_slide(DEFAULT_SLIDE_TITLE, line);
    }
    save_deck(&deck, out_dir)
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Read};

    use zip::ZipArchive;

    use super::*;

    fn read_part(path: &Path, name: &str) -> String {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    fn slide_parts(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_single_slide_binds_title_and_body() {
        let dir = tempfile::tempdir().unwrap();

        let artifact = render_slides_single("Quarterly <Review>", "Revenue & costs", dir.path())
            .expect("deck should render");

        assert_eq!(artifact.kind, ArtifactKind::SlideDeck);
        assert_eq!(slide_parts(&artifact.path).len(), 1);

        let slide = read_part(&artifact.path, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:t>Quarterly &lt;Review&gt;</a:t>"));
        assert!(slide.contains("<a:t>Revenue &amp; costs</a:t>"));
    }

    #[test]
    fn test_slides_from_lines_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let text = "first point\n\n   \nsecond point\n\t\nthird point\n";

        let artifact = render_slides_from_lines(text.lines(), dir.path()).unwrap();

        assert_eq!(slide_parts(&artifact.path).len(), 3);
        for (n, expected) in [(1, "first point"), (2, "second point"), (3, "third point")] {
            let slide = read_part(&artifact.path, &format!("ppt/slides/slide{n}.xml"));
            assert!(slide.contains(&format!("<a:t>{expected}</a:t>")), "{slide}");
            assert!(slide.contains("<a:t>Slide</a:t>"));
        }

        let presentation = read_part(&artifact.path, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 3);
    }

    #[test]
    fn test_only_blank_lines_yields_empty_deck() {
        let dir = tempfile::tempdir().unwrap();

        let artifact = render_slides_from_lines(["", "  "], dir.path()).unwrap();

        assert!(slide_parts(&artifact.path).is_empty());
        let presentation = read_part(&artifact.path, "ppt/presentation.xml");
        assert!(!presentation.contains("sldIdLst"));
    }

    #[test]
    fn test_body_newlines_become_paragraphs() {
        assert_eq!(
            paragraphs("a\r\n\nb"),
            concat!(
                r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>a</a:t></a:r></a:p>"#,
                "<a:p/>",
                r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>b</a:t></a:r></a:p>"#,
            )
        );
    }

    #[test]
    fn test_each_render_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();

        let first = render_slides_single("a", "b", dir.path()).unwrap();
        let second = render_slides_single("a", "b", dir.path()).unwrap();

        assert_ne!(first.path, second.path);
    }
}
