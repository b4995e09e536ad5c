//! # Quire
//!
//! A paginated layout engine, and a word-puzzle printer built on it.
//!
//! Layout happens in two passes. **Fill** measures a content tree under
//! inherited style and constraints and returns an immutable placement;
//! **draw** replays that placement onto a [`Canvas`](canvas::Canvas).
//! Pagination is fill with a cursor: each page takes as much of the stream
//! as fits and hands back where the next page resumes, so content is never
//! lost, duplicated, or reordered across page breaks.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON)
//!       ↓
//!   [puzzle]   - Grid of letters and word identities
//!       ↓
//!   [render]   - Content tree: title, bordered grid table, clue columns
//!       ↓
//!   [layout]   - Fill / paginate / draw
//!       ↓
//!   [pdf]      - Canvas that serializes to PDF bytes
//! ```

pub mod canvas;
pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod puzzle;
pub mod render;
pub mod style;

use error::{LayoutError, QuireError};
use layout::{LayoutEngine, Paginator};
use pdf::PdfCanvas;
use puzzle::file::PuzzleFile;

/// A rendered puzzle document.
#[derive(Debug)]
pub struct Rendered {
    pub pdf: Vec<u8>,
    pub pages: usize,
    /// Content that was skipped, clamped, or truncated along the way.
    pub warnings: Vec<LayoutError>,
}

/// Render a puzzle to PDF bytes.
///
/// This is the primary entry point. Bad grids and undrawable layouts are
/// errors; content that merely did not fit is reported in
/// [`Rendered::warnings`].
pub fn render(file: &PuzzleFile) -> Result<Rendered, QuireError> {
    let grid = file.grid()?;
    let stream = render::puzzle_document(file.title.as_deref(), &grid, &file.options, &file.page)?;

    let engine = LayoutEngine::new();
    let document = Paginator::new(&engine, file.page.clone()).paginate(&stream);

    let mut canvas = PdfCanvas::new(engine.fonts());
    document.draw(&engine, &mut canvas)?;
    let pdf = canvas.finish(&file.metadata());

    tracing::info!(
        pages = document.page_count(),
        warnings = document.warnings.len(),
        bytes = pdf.len(),
        "rendered puzzle"
    );
    Ok(Rendered {
        pdf,
        pages: document.page_count(),
        warnings: document.warnings,
    })
}

/// Render a puzzle described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<Rendered, QuireError> {
    render(&PuzzleFile::from_json(json)?)
}
