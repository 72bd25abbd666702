use std::{io::BufWriter, path::Path};

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{artifact::create_artifact_file, Artifact, ArtifactError, ArtifactKind};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const FONT_SIZE_PT: f32 = 12.0;
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Helvetica advance widths (per 1000 em) for U+0020..=U+007E
#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica advance widths for U+00A0..=U+00FF
#[rustfmt::skip]
const LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

fn lines_per_page() -> usize {
    ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / LINE_HEIGHT_MM) as usize
}

fn usable_width_mm() -> f32 {
    PAGE_WIDTH_MM - 2.0 * MARGIN_MM
}

/// Writes `text` as a wrapped paragraph block into a new PDF under `out_dir`.
/// Pages are added as needed.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn render_pdf(text: &str, out_dir: &Path) -> Result<Artifact, ArtifactError> {
    let kind = ArtifactKind::Pdf;

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Recap",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ArtifactError::render(kind, e))?;

    let lines = wrap_text(&to_win_ansi(text), usable_width_mm());
    let mut layer = doc.get_page(first_page).get_layer(first_layer);

    for (page_idx, page_lines) in lines.chunks(lines_per_page()).enumerate() {
        if page_idx > 0 {
            let (page, page_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
        }

        for (row, line) in page_lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM * (row as f32 + 0.7);
            layer.use_text(line.as_str(), FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
        }
    }

    let (file, artifact) =
        create_artifact_file(out_dir, kind).map_err(|e| ArtifactError::render(kind, e))?;

    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ArtifactError::render(kind, e))
        .inspect_err(|e| tracing::error!(error = %e, "Failed to write PDF"))?;

    tracing::info!(path = %artifact.path.display(), lines = lines.len(), "PDF rendered");

    Ok(artifact)
}

/// Characters outside WinAnsiEncoding ({0x20..0x7E, 0xA0..0xFF} plus the
/// typographic extras in 0x80..0x9F) are not covered by the built-in fonts
fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || extra_width(c).is_some()
}

fn extra_width(c: char) -> Option<u16> {
    let width = match c {
        '€' | 'ƒ' | '†' | '‡' | '–' => 556,
        '‚' | '‘' | '’' => 222,
        '„' | '“' | '”' | 'ˆ' | '‹' | '›' | '˜' => 333,
        '…' | '‰' | 'Œ' | '—' | '™' => 1000,
        'Š' | 'Ÿ' => 667,
        'Ž' => 611,
        '•' => 350,
        'š' | 'ž' => 500,
        'œ' => 944,
        _ => return None,
    };
    Some(width)
}

fn to_win_ansi(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            '\n' => '\n',
            c if c.is_control() => ' ',
            c if is_win_ansi(c) => c,
            _ => '?',
        })
        .collect()
}

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => ASCII_WIDTHS[c as usize - 0x20],
        '\u{A0}'..='\u{FF}' => LATIN1_WIDTHS[c as usize - 0xA0],
        c => extra_width(c).unwrap_or(1000),
    }
}

/// Rendered width of `text` in Helvetica at the body font size
fn text_width_mm(text: &str) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 / 1000.0 * FONT_SIZE_PT * MM_PER_PT
}

/// Greedy word wrap against the measured line width. Explicit newlines always
/// start a new line and words wider than a line are split.
fn wrap_text(text: &str, max_width_mm: f32) -> Vec<String> {
    let space = text_width_mm(" ");
    let mut lines = Vec::new();

    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in raw_line.split_whitespace() {
            let mut word = word;
            let mut word_width = text_width_mm(word);

            while word_width > max_width_mm {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                let split_at = fitting_prefix_len(word, max_width_mm);
                lines.push(word[..split_at].to_string());
                word = &word[split_at..];
                word_width = text_width_mm(word);
            }

            if word.is_empty() {
                continue;
            }

            if !current.is_empty() && current_width + space + word_width > max_width_mm {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if !current.is_empty() {
                current.push(' ');
                current_width += space;
            }
            current.push_str(word);
            current_width += word_width;
        }

        lines.push(current);
    }

    lines
}

/// Byte length of the longest prefix of `word` that fits, at least one char
fn fitting_prefix_len(word: &str, max_width_mm: f32) -> usize {
    let max_units = max_width_mm / (FONT_SIZE_PT * MM_PER_PT) * 1000.0;
    let mut units = 0.0;
    let mut end = 0;

    for (idx, c) in word.char_indices() {
        units += f32::from(char_width(c));
        if units > max_units && idx > 0 {
            break;
        }
        end = idx + c.len_utf8();
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fits(lines: &[String]) {
        for line in lines {
            assert!(
                text_width_mm(line) <= usable_width_mm(),
                "{line:?} is {}mm wide",
                text_width_mm(line)
            );
        }
    }

    #[test]
    fn test_wrap_respects_width_and_keeps_words() {
        let text = "the quick brown fox jumps over the lazy dog";
        let lines = wrap_text(text, 20.0);

        assert!(lines.iter().all(|l| text_width_mm(l) <= 20.0), "{lines:?}");
        assert_eq!(lines.join(" "), text);
        assert_eq!(lines[0], "the quick");
    }

    #[test]
    fn test_wrap_honours_newlines() {
        let lines = wrap_text("first\n\nthird", usable_width_mm());
        assert_eq!(lines, vec!["first", "", "third"]);
    }

    #[test]
    fn test_wrap_splits_overlong_words() {
        // four digits are ~9.4mm wide
        let lines = wrap_text("12 1234567890", 9.5);
        assert_eq!(lines, vec!["12", "1234", "5678", "90"]);
    }

    #[test]
    fn test_wide_glyphs_stay_within_margins() {
        for text in ["W".repeat(88), "0".repeat(88)] {
            let lines = wrap_text(&text, usable_width_mm());
            assert!(lines.len() > 1, "{text} should wrap");
            assert_fits(&lines);
            assert_eq!(lines.concat(), text);
        }

        let text = "MMMMMMMMMM ".repeat(8);
        let lines = wrap_text(&text, usable_width_mm());
        assert!(lines.len() > 1);
        assert_fits(&lines);
        assert_eq!(
            lines.join(" ").split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_narrow_glyphs_fill_the_line() {
        let text = "i ".repeat(80);
        let lines = wrap_text(text.trim_end(), usable_width_mm());
        assert_fits(&lines);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_win_ansi_typography_is_kept() {
        assert_eq!(
            to_win_ansi("It’s “key” — • point €5 … – ‘ok’"),
            "It’s “key” — • point €5 … – ‘ok’"
        );
    }

    #[test]
    fn test_unsupported_chars_are_replaced() {
        assert_eq!(to_win_ansi("café 🚀\tok → Ω"), "café ? ok ? ?");
    }

    #[test]
    fn test_render_pdf_writes_pdf_file() {
        let dir = tempfile::tempdir().unwrap();

        let artifact = render_pdf("Hello from the summary. It’s “quoted”.", dir.path()).unwrap();

        assert_eq!(artifact.kind, ArtifactKind::Pdf);
        assert_eq!(artifact.mime_type(), "application/pdf");
        let bytes = std::fs::read(&artifact.path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_pdf_paginates_long_text() {
        let dir = tempfile::tempdir().unwrap();
        let text = (0..200)
            .map(|i| format!("Line number {i}"))
            .collect::<Vec<_>>()
            .join("\n");

        let short = render_pdf("one line", dir.path()).unwrap();
        let long = render_pdf(&text, dir.path()).unwrap();

        let page_count = |path: &Path| {
            let bytes = std::fs::read(path).unwrap();
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .unwrap()
                .len()
        };
        assert_eq!(page_count(&short.path), 1);
        assert_eq!(page_count(&long.path), 200usize.div_ceil(lines_per_page()));
        assert_eq!(page_count(&long.path), 8);
        assert_ne!(short.path, long.path, "each render gets its own file");
    }
}
