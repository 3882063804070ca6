use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run, RunFonts, Style, StyleType};

use crate::error::ReportError;
use crate::styles::DocumentStyles;

/// Lay out a rendered text report as a DOCX document.
///
/// One paragraph per report line:
/// - all upper-case lines (e.g. `LIIKELAAJUUDET JA VOIMAT`) → title style
/// - lines ending in `:` (e.g. `Lonkka:`) → section heading style
/// - empty lines → empty paragraph
/// - everything else → body paragraph
pub fn generate_docx(report: &str, styles: &DocumentStyles) -> Result<Vec<u8>, ReportError> {
    let mut docx = Docx::new()
        .add_style(heading_style("ReportTitle", "report title", styles.title_size))
        .add_style(heading_style("ReportSection", "report section", styles.section_size));

    for line in report.lines() {
        let trimmed = line.trim_end();
        let paragraph = match line_kind(trimmed) {
            LineKind::Empty => Paragraph::new(),
            LineKind::Title => styled_paragraph(trimmed, "ReportTitle", styles),
            LineKind::Section => styled_paragraph(trimmed, "ReportSection", styles),
            LineKind::Body => Paragraph::new()
                .align(AlignmentType::Left)
                .add_run(body_run(trimmed, styles)),
        };
        docx = docx.add_paragraph(paragraph);
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ReportError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    Empty,
    Title,
    Section,
    Body,
}

fn line_kind(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Empty;
    }
    let has_letters = line.chars().any(char::is_alphabetic);
    if has_letters && !line.chars().any(char::is_lowercase) {
        LineKind::Title
    } else if line.ends_with(':') {
        LineKind::Section
    } else {
        LineKind::Body
    }
}

fn heading_style(style_id: &str, name: &str, size_pt: usize) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_pt * 2) // OOXML uses half-points
        .bold()
}

fn styled_paragraph(text: &str, style_id: &str, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new()
        .style(style_id)
        .add_run(Run::new().add_text(text).fonts(RunFonts::new().ascii(&styles.font)))
}

fn body_run(text: &str, styles: &DocumentStyles) -> Run {
    Run::new()
        .add_text(text)
        .size(styles.body_size * 2)
        .fonts(RunFonts::new().ascii(&styles.font))
}
