//! # Pagination
//!
//! Drives a content stream through a sequence of page areas. Each page
//! calls [`LayoutEngine::fill_from`] with the cursor the previous page
//! returned, until the stream is exhausted or the page cap is hit.
//!
//! The state of the stream between pages is one of:
//!
//! - **Streaming**: whole children are still waiting.
//! - **Draining**: a child was split at the bottom of the last page and the
//!   rest of it comes first.
//! - **Exhausted**: nothing left.
//!
//! Layout problems never abort pagination. Oversized content, a failed
//! fill, and truncation at the page cap are all recorded as warnings on
//! the [`Document`], which still holds every page that could be laid out.

use super::constraint::Constraint;
use super::flow::{FlowOptions, StreamCursor};
use super::{LayoutEngine, PlacedNode};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::model::{ContentNode, Edges, PageConfig};
use crate::style::{Style, StyleOverride};

/// Font size of the page footer line.
const FOOTER_FONT_SIZE: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    Streaming,
    Draining,
    Exhausted,
}

impl PaginationState {
    pub fn of(cursor: Option<&StreamCursor>) -> Self {
        match cursor {
            None => PaginationState::Exhausted,
            Some(c) if c.is_draining() => PaginationState::Draining,
            Some(_) => PaginationState::Streaming,
        }
    }
}

/// A placed node and where its origin sits on the page.
#[derive(Debug, Clone)]
pub struct PlacedFrame {
    pub placed: PlacedNode,
    pub x: f64,
    pub y: f64,
}

/// The footer line of one page. Each page has its own text, so it owns the
/// node it was placed from.
#[derive(Debug, Clone)]
pub struct Footer {
    pub content: ContentNode,
    pub frame: PlacedFrame,
}

#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub margin: Edges,
    /// Fragments of the document stream placed on this page.
    pub frames: Vec<PlacedFrame>,
    pub footer: Option<Footer>,
}

/// The laid-out document: its pages plus the stream they were cut from.
#[derive(Debug)]
pub struct Document<'a> {
    pub stream: &'a ContentNode,
    pub pages: Vec<Page>,
    pub warnings: Vec<LayoutError>,
    /// Where pagination stopped. Anything but `Exhausted` means truncated.
    pub state: PaginationState,
}

impl Document<'_> {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.state != PaginationState::Exhausted
    }

    /// Draw every page in order.
    ///
    /// A page that fails to draw is left partial and the remaining pages
    /// are still drawn; the first failure is returned afterwards.
    pub fn draw(&self, engine: &LayoutEngine, canvas: &mut dyn Canvas) -> Result<(), LayoutError> {
        let mut first_error = None;
        for page in &self.pages {
            canvas.begin_page(page.width, page.height);
            if let Err(e) = self.draw_page(engine, page, canvas) {
                tracing::error!(page = page.number, error = %e, "page could not be drawn");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn draw_page(&self, engine: &LayoutEngine, page: &Page, canvas: &mut dyn Canvas) -> Result<(), LayoutError> {
        for frame in &page.frames {
            engine.draw(self.stream, &frame.placed, canvas, frame.x, frame.y)?;
        }
        if let Some(footer) = &page.footer {
            engine.draw(
                &footer.content,
                &footer.frame.placed,
                canvas,
                footer.frame.x,
                footer.frame.y,
            )?;
        }
        Ok(())
    }
}

/// Lays a stream out page by page.
pub struct Paginator<'e> {
    engine: &'e LayoutEngine,
    config: PageConfig,
    style: Style,
}

impl<'e> Paginator<'e> {
    pub fn new(engine: &'e LayoutEngine, config: PageConfig) -> Self {
        Self {
            engine,
            config,
            style: Style::default(),
        }
    }

    /// Root style inherited by the whole stream.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn paginate<'a>(&self, stream: &'a ContentNode) -> Document<'a> {
        let (page_width, page_height) = self.config.size.dimensions();
        let (content_width, content_height) = self.config.content_size();
        let margin = self.config.margin;
        let footer_style = StyleOverride::default()
            .size(FOOTER_FONT_SIZE)
            .resolve(&self.style);
        let footer_height = if self.config.footer.is_some() {
            footer_style.line_box().min(content_height)
        } else {
            0.0
        };
        let body = Constraint::bounded(content_width, content_height - footer_height);
        let options = FlowOptions {
            clamp_oversized: self.config.clamp_oversized,
        };

        let mut pages: Vec<Page> = Vec::new();
        let mut warnings = Vec::new();
        let mut cursor = Some(StreamCursor::start());

        while let Some(current) = cursor.clone() {
            if let Some(limit) = self.config.max_pages {
                if pages.len() >= limit {
                    tracing::warn!(limit, "page limit reached, truncating");
                    warnings.push(LayoutError::PageLimitExceeded { limit });
                    break;
                }
            }

            cursor = match self.engine.fill_from(stream, &self.style, &body, &current, options) {
                Ok(fragment) => {
                    warnings.extend(fragment.warnings);
                    if fragment.next.as_ref() == Some(&current) {
                        // Flow always places or skips the first child of an
                        // empty area, so this means the stream is malformed.
                        let e = LayoutError::mismatch(format!("no progress from {current:?}"));
                        tracing::error!(error = %e, "skipping stuck content");
                        warnings.push(e);
                        skip_child(stream, &current)
                    } else {
                        if !stream.is_splittable() || !fragment.placed.children.is_empty() {
                            let number = pages.len() + 1;
                            tracing::debug!(
                                page = number,
                                children = ?fragment.placed.child_indices(),
                                state = ?PaginationState::of(fragment.next.as_ref()),
                                "laid out page"
                            );
                            pages.push(Page {
                                number,
                                width: page_width,
                                height: page_height,
                                margin,
                                frames: vec![PlacedFrame {
                                    placed: fragment.placed,
                                    x: margin.left,
                                    y: margin.top,
                                }],
                                footer: None,
                            });
                        }
                        fragment.next
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, cursor = ?current, "layout failed, skipping content");
                    warnings.push(e);
                    skip_child(stream, &current)
                }
            };
        }

        if let Some(template) = &self.config.footer {
            let total = pages.len();
            let area = Constraint::bounded(content_width, footer_height);
            for page in &mut pages {
                let text = template
                    .replace("{page}", &page.number.to_string())
                    .replace("{pages}", &total.to_string());
                let content = ContentNode::styled_text(&text, StyleOverride::default().size(FOOTER_FONT_SIZE));
                match self.engine.fill(&content, &self.style, &area) {
                    Ok(placed) => {
                        let x = margin.left + (content_width - placed.width) / 2.0;
                        let y = margin.top + content_height - footer_height;
                        page.footer = Some(Footer {
                            content,
                            frame: PlacedFrame { placed, x, y },
                        });
                    }
                    Err(e) => warnings.push(e),
                }
            }
        }

        let state = PaginationState::of(cursor.as_ref());
        tracing::debug!(pages = pages.len(), ?state, warnings = warnings.len(), "pagination finished");
        Document {
            stream,
            pages,
            warnings,
            state,
        }
    }
}

/// Cursor past the top-level child `current` points into.
fn skip_child(stream: &ContentNode, current: &StreamCursor) -> Option<StreamCursor> {
    let next = current.skip_current();
    (next.index < stream.children().len()).then_some(next)
}
