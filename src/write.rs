//! Document writers: plain text and a paginated PDF.
//!
//! The PDF is assembled directly with `lopdf` using the standard Helvetica
//! fonts with WinAnsi encoding, so any character outside Latin-1 must be
//! sanitized away before rendering. Common typographic characters are mapped
//! to ASCII equivalents first so dashes and quotes survive.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use tracing::info;

use crate::error::WriteError;
use crate::summarize::SummaryUnit;

// A4 geometry and type sizes, in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const LEADING: f32 = 14.0;

/// Characters per wrapped body line. Conservative for Helvetica 11pt within
/// the printable width.
const WRAP_WIDTH: usize = 90;

/// Write the summary as plain text: each unit as a `# title` line followed
/// by its body and a blank line.
pub fn write_text(units: &[SummaryUnit], path: &Path) -> Result<(), WriteError> {
    let rendered: Vec<String> = units
        .iter()
        .map(|u| format!("# {}\n{}\n\n", u.section_title, u.text))
        .collect();
    std::fs::write(path, rendered.join("\n")).map_err(|source| WriteError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), "text summary written");
    Ok(())
}

/// Write the summary as a paginated PDF: a bold document title, then each
/// unit's title as a bold heading followed by wrapped body paragraphs.
pub fn write_pdf(units: &[SummaryUnit], path: &Path, book_title: &str) -> Result<(), WriteError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut layout = PageLayout::new();

    // Document header, centered.
    let header = sanitize_for_pdf(&format!("{book_title} - Summary"));
    layout.center_line(&header, "F2", TITLE_SIZE);
    layout.advance(LEADING);

    for unit in units {
        layout.ensure_room(2.0 * LEADING);
        layout.line(&sanitize_for_pdf(&unit.section_title), "F2", HEADING_SIZE);
        for paragraph in unit.text.lines().filter(|l| !l.trim().is_empty()) {
            for wrapped in wrap_words(paragraph.trim(), WRAP_WIDTH) {
                layout.line(&sanitize_for_pdf(&wrapped), "F1", BODY_SIZE);
            }
        }
        layout.advance(LEADING / 2.0);
    }

    let mut kids: Vec<Object> = Vec::new();
    let page_count = layout.pages.len() as i64;
    for content in layout.pages {
        let encoded = Content {
            operations: content,
        }
        .encode()
        .map_err(|e| WriteError::Pdf {
            message: e.to_string(),
        })?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(path).map_err(|e| WriteError::Pdf {
        message: e.to_string(),
    })?;
    info!(path = %path.display(), pages = page_count, "PDF summary written");
    Ok(())
}

/// Accumulates text operations page by page, breaking when the cursor
/// reaches the bottom margin.
struct PageLayout {
    pages: Vec<Vec<Operation>>,
    cursor_y: f32,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor_y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ensure_room(&mut self, needed: f32) {
        if self.cursor_y - needed < MARGIN {
            self.pages.push(Vec::new());
            self.cursor_y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn advance(&mut self, amount: f32) {
        self.cursor_y -= amount;
    }

    fn line(&mut self, text: &str, font: &str, size: f32) {
        self.line_at(text, font, size, MARGIN);
    }

    fn center_line(&mut self, text: &str, font: &str, size: f32) {
        // Approximate centering: Helvetica averages about half an em per glyph.
        let width = text.len() as f32 * size * 0.5;
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.line_at(text, font, size, x);
    }

    fn line_at(&mut self, text: &str, font: &str, size: f32, x: f32) {
        self.ensure_room(LEADING);
        self.advance(LEADING);
        let ops = self.pages.last_mut().unwrap();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), self.cursor_y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(
                latin1_bytes(text),
                StringFormat::Literal,
            )],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
}

/// Replace characters the PDF writer cannot encode. Typographic dashes and
/// quotes map to ASCII equivalents; anything else beyond Latin-1 becomes a
/// space.
pub fn sanitize_for_pdf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2013}' => out.push('-'),
            '\u{2014}' => out.push_str("--"),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201c}' | '\u{201d}' => out.push('"'),
            c if (c as u32) < 256 => out.push(c),
            _ => out.push(' '),
        }
    }
    out
}

/// Encode a sanitized string as Latin-1 bytes for a PDF string literal.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u32 as u8 } else { b' ' })
        .collect()
}

/// Greedy word wrap to at most `width` characters per line. Words longer
/// than the width get a line of their own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
