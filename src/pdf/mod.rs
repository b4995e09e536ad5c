//! # PDF Output
//!
//! [`PdfCanvas`] is a [`Canvas`] that writes each page as a PDF content
//! stream and serializes the whole document as PDF 1.7 on [`finish`].
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, pages, content streams
//! ...
//! xref                <- byte offset of each object
//! trailer             <- points to the catalog and the info dictionary
//! %%EOF
//! ```
//!
//! Only the standard Type1 fonts are used, so nothing is embedded: each face
//! is a single font dictionary with WinAnsiEncoding. Characters outside that
//! encoding are written as `?`.
//!
//! [`finish`]: PdfCanvas::finish

use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::canvas::{Canvas, Paint, PathSegment, Rect};
use crate::font::{FontContext, StandardFont};
use crate::model::{Metadata, PageSize};
use crate::style::{Color, Style};

/// One page of content, in PDF operators with a bottom-left origin.
struct PdfPage {
    width: f64,
    height: f64,
    content: String,
}

pub struct PdfCanvas<'f> {
    fonts: &'f FontContext,
    pages: Vec<PdfPage>,
    /// Faces in order of first use; the index is the `/F{n}` resource name.
    used_fonts: Vec<StandardFont>,
}

impl<'f> PdfCanvas<'f> {
    pub fn new(fonts: &'f FontContext) -> Self {
        Self {
            fonts,
            pages: Vec::new(),
            used_fonts: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page drawing happens on; an A4 page is opened if none was begun.
    fn page(&mut self) -> &mut PdfPage {
        if self.pages.is_empty() {
            let (width, height) = PageSize::A4.dimensions();
            self.begin_page(width, height);
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn font_index(&mut self, font: StandardFont) -> usize {
        match self.used_fonts.iter().position(|f| *f == font) {
            Some(i) => i,
            None => {
                self.used_fonts.push(font);
                self.used_fonts.len() - 1
            }
        }
    }

    /// Serialize every page into a PDF byte stream.
    pub fn finish(self, metadata: &Metadata) -> Vec<u8> {
        let mut objects: Vec<Vec<u8>> = Vec::new();
        // 0 is the free-list head, 1 the catalog, 2 the page tree.
        objects.push(Vec::new());
        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
        objects.push(Vec::new());

        let mut font_ids = Vec::new();
        for font in &self.used_fonts {
            font_ids.push(objects.len());
            objects.push(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.pdf_name()
                )
                .into_bytes(),
            );
        }
        let font_resources = font_ids
            .iter()
            .enumerate()
            .map(|(i, id)| format!("/F{i} {id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");

        let mut page_ids = Vec::new();
        for page in &self.pages {
            let compressed = compress_to_vec_zlib(page.content.as_bytes(), 6);
            let content_id = objects.len();
            let mut data: Vec<u8> = Vec::new();
            let _ = write!(
                data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            data.extend_from_slice(&compressed);
            data.extend_from_slice(b"\nendstream");
            objects.push(data);

            page_ids.push(objects.len());
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                    page.width, page.height, content_id, font_resources
                )
                .into_bytes(),
            );
        }

        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        objects[2] = format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, page_ids.len()).into_bytes();

        let info_id = objects.len();
        objects.push(info_dictionary(metadata).into_bytes());

        serialize(&objects, info_id)
    }
}

impl Canvas for PdfCanvas<'_> {
    fn begin_page(&mut self, width: f64, height: f64) {
        self.pages.push(PdfPage {
            width,
            height,
            content: String::new(),
        });
    }

    fn draw_text(&mut self, style: &Style, text: &str, x: f64, y: f64) {
        let font = self.fonts.font_for(style);
        let index = self.font_index(font);
        let page = self.page();
        let baseline = page.height - y;
        let Color { r, g, b } = style.color;
        let _ = write!(
            page.content,
            "BT\n{r:.3} {g:.3} {b:.3} rg\n/F{index} {:.2} Tf\n{x:.2} {baseline:.2} Td\n({}) Tj\nET\n",
            style.font_size,
            escape_pdf_string(text)
        );
    }

    fn draw_rect(&mut self, rect: Rect, paint: Paint) {
        let page = self.page();
        let bottom = page.height - rect.bottom;
        let _ = write!(page.content, "q\n");
        write_paint(&mut page.content, paint);
        let _ = write!(
            page.content,
            "{:.2} {:.2} {:.2} {:.2} re\n{}\nQ\n",
            rect.left,
            bottom,
            rect.width(),
            rect.height(),
            paint_operator(paint)
        );
    }

    fn draw_path(&mut self, segments: &[PathSegment], paint: Paint) {
        if segments.is_empty() {
            return;
        }
        let page = self.page();
        let height = page.height;
        let _ = write!(page.content, "q\n");
        write_paint(&mut page.content, paint);
        for segment in segments {
            let _ = match *segment {
                PathSegment::MoveTo(x, y) => writeln!(page.content, "{:.2} {:.2} m", x, height - y),
                PathSegment::LineTo(x, y) => writeln!(page.content, "{:.2} {:.2} l", x, height - y),
                PathSegment::Close => writeln!(page.content, "h"),
            };
        }
        let _ = write!(page.content, "{}\nQ\n", paint_operator(paint));
    }

    fn push_clip(&mut self, rect: Rect) {
        let page = self.page();
        let bottom = page.height - rect.bottom;
        let _ = write!(
            page.content,
            "q\n{:.2} {:.2} {:.2} {:.2} re W n\n",
            rect.left,
            bottom,
            rect.width(),
            rect.height()
        );
    }

    fn pop_clip(&mut self) {
        let _ = writeln!(self.page().content, "Q");
    }
}

fn write_paint(out: &mut String, paint: Paint) {
    let Color { r, g, b } = paint.color;
    if paint.fill {
        let _ = writeln!(out, "{r:.3} {g:.3} {b:.3} rg");
    }
    if let Some(width) = paint.stroke {
        let _ = writeln!(out, "{r:.3} {g:.3} {b:.3} RG\n{width:.2} w");
    }
}

fn paint_operator(paint: Paint) -> &'static str {
    match (paint.fill, paint.stroke.is_some()) {
        (true, true) => "B",
        (false, true) => "S",
        (true, false) => "f",
        // Neither: end the path without painting.
        (false, false) => "n",
    }
}

fn info_dictionary(metadata: &Metadata) -> String {
    let mut info = String::from("<< ");
    if let Some(title) = &metadata.title {
        let _ = write!(info, "/Title ({}) ", escape_pdf_string(title));
    }
    if let Some(author) = &metadata.author {
        let _ = write!(info, "/Author ({}) ", escape_pdf_string(author));
    }
    if let Some(subject) = &metadata.subject {
        let _ = write!(info, "/Subject ({}) ", escape_pdf_string(subject));
    }
    let _ = write!(
        info,
        "/Producer (Quire {}) /Creator (Quire) >>",
        env!("CARGO_PKG_VERSION")
    );
    info
}

/// Escape and encode text for a PDF literal string in WinAnsiEncoding.
fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => match unicode_to_winansi(ch) {
                Some(byte) if byte.is_ascii() => out.push(byte as char),
                Some(byte) => {
                    let _ = write!(out, "\\{byte:03o}");
                }
                None => out.push('?'),
            },
        }
    }
    out
}

/// Map a Unicode codepoint to a WinAnsiEncoding byte value.
///
/// 0x20..=0x7E and 0xA0..=0xFF map directly; 0x80..=0x9F holds the
/// Windows-1252 specials.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82), // Single low-9 quotation mark
        0x0192 => Some(0x83), // Latin small letter f with hook
        0x201E => Some(0x84), // Double low-9 quotation mark
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2020 => Some(0x86), // Dagger
        0x2021 => Some(0x87), // Double dagger
        0x02C6 => Some(0x88), // Modifier letter circumflex accent
        0x2030 => Some(0x89), // Per mille sign
        0x0160 => Some(0x8A), // Latin capital letter S with caron
        0x2039 => Some(0x8B), // Single left-pointing angle quotation
        0x0152 => Some(0x8C), // Latin capital ligature OE
        0x017D => Some(0x8E), // Latin capital letter Z with caron
        0x2018 => Some(0x91), // Left single quotation mark
        0x2019 => Some(0x92), // Right single quotation mark
        0x201C => Some(0x93), // Left double quotation mark
        0x201D => Some(0x94), // Right double quotation mark
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97), // Em dash
        0x02DC => Some(0x98), // Small tilde
        0x2122 => Some(0x99), // Trade mark sign
        0x0161 => Some(0x9A), // Latin small letter s with caron
        0x203A => Some(0x9B), // Single right-pointing angle quotation
        0x0153 => Some(0x9C), // Latin small ligature oe
        0x017E => Some(0x9E), // Latin small letter z with caron
        0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
        _ => None,
    }
}

/// Write the header, every object, the xref table and the trailer.
fn serialize(objects: &[Vec<u8>], info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = vec![0; objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, data) in objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{i} 0 obj\n");
        output.extend_from_slice(data);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", objects.len());
    let _ = write!(output, "0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len(),
        info_id,
        xref_offset
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleOverride;

    fn contains(bytes: &[u8], needle: &str) -> bool {
        bytes.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    fn content_of(page: &PdfPage) -> String {
        page.content.clone()
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(escape_pdf_string("back\\slash"), "back\\\\slash");
        assert_eq!(escape_pdf_string("caf\u{e9}"), "caf\\351");
        assert_eq!(escape_pdf_string("\u{4e2d}"), "?");
    }

    #[test]
    fn test_winansi_specials() {
        assert_eq!(unicode_to_winansi('\u{2014}'), Some(0x97));
        assert_eq!(unicode_to_winansi('A'), Some(b'A'));
        assert_eq!(unicode_to_winansi('\u{1F600}'), None);
    }

    #[test]
    fn test_empty_document_produces_valid_pdf() {
        let fonts = FontContext::new();
        let mut canvas = PdfCanvas::new(&fonts);
        canvas.begin_page(595.28, 841.89);
        let bytes = canvas.finish(&Metadata::default());

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(contains(&bytes, "%%EOF"));
        assert!(contains(&bytes, "xref"));
        assert!(contains(&bytes, "/Count 1"));
        assert!(contains(&bytes, "/MediaBox [0 0 595.28 841.89]"));
    }

    #[test]
    fn test_metadata_in_pdf() {
        let fonts = FontContext::new();
        let canvas = PdfCanvas::new(&fonts);
        let bytes = canvas.finish(&Metadata {
            title: Some("Test (Document)".to_string()),
            author: Some("Quire".to_string()),
            subject: None,
        });
        assert!(contains(&bytes, "/Title (Test \\(Document\\))"));
        assert!(contains(&bytes, "/Author (Quire)"));
        assert!(!contains(&bytes, "/Subject"));
    }

    #[test]
    fn test_fonts_registered_once_per_face() {
        let fonts = FontContext::new();
        let mut canvas = PdfCanvas::new(&fonts);
        canvas.begin_page(100.0, 100.0);
        let regular = Style::default();
        let bold = StyleOverride::default().bold().resolve(&regular);
        canvas.draw_text(&regular, "a", 0.0, 10.0);
        canvas.draw_text(&bold, "b", 0.0, 20.0);
        canvas.draw_text(&regular, "c", 0.0, 30.0);
        assert_eq!(
            canvas.used_fonts,
            vec![StandardFont::Helvetica, StandardFont::HelveticaBold]
        );
        let bytes = canvas.finish(&Metadata::default());
        assert!(contains(&bytes, "/BaseFont /Helvetica-Bold"));
        assert!(contains(&bytes, "/F1 "));
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let fonts = FontContext::new();
        let mut canvas = PdfCanvas::new(&fonts);
        canvas.begin_page(200.0, 100.0);
        canvas.draw_rect(Rect::new(10.0, 20.0, 30.0, 40.0), Paint::fill(Color::BLACK));
        canvas.draw_text(&Style::default(), "x", 5.0, 90.0);
        let content = content_of(&canvas.pages[0]);
        assert!(content.contains("10.00 40.00 30.00 40.00 re\nf"), "{content}");
        assert!(content.contains("5.00 10.00 Td"), "{content}");
    }

    #[test]
    fn test_path_operators() {
        let fonts = FontContext::new();
        let mut canvas = PdfCanvas::new(&fonts);
        canvas.begin_page(100.0, 100.0);
        canvas.draw_path(
            &[
                PathSegment::MoveTo(0.0, 0.0),
                PathSegment::LineTo(10.0, 0.0),
                PathSegment::Close,
            ],
            Paint::stroke(Color::BLACK, 0.5),
        );
        let content = content_of(&canvas.pages[0]);
        assert!(content.contains("0.50 w"));
        assert!(content.contains("0.00 100.00 m\n10.00 100.00 l\nh\nS"), "{content}");
    }

    #[test]
    fn test_clip_wraps_in_saved_state() {
        let fonts = FontContext::new();
        let mut canvas = PdfCanvas::new(&fonts);
        canvas.begin_page(100.0, 100.0);
        canvas.push_clip(Rect::new(10.0, 20.0, 30.0, 40.0));
        canvas.draw_text(&Style::default(), "clipped", 10.0, 30.0);
        canvas.pop_clip();
        let content = content_of(&canvas.pages[0]);
        let clip = content.find("q\n10.00 40.00 30.00 40.00 re W n").expect("clip set");
        let text = content.find("(clipped) Tj").expect("text drawn");
        let restore = content.rfind("Q\n").expect("state restored");
        assert!(clip < text && text < restore, "{content}");
    }

    #[test]
    fn test_draw_without_page_opens_one() {
        let fonts = FontContext::new();
        let mut canvas = PdfCanvas::new(&fonts);
        canvas.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Paint::fill(Color::WHITE));
        assert_eq!(canvas.page_count(), 1);
    }
}
