//! # Drawing Surface
//!
//! The engine draws through the [`Canvas`] trait and knows nothing about
//! output formats. Coordinates are in points with the origin at the top-left
//! of the page and y increasing downward; surfaces with a different origin
//! (PDF's is bottom-left) convert internally.
//!
//! [`RecordingCanvas`] keeps every call as a [`DrawOp`]. Tests use it to
//! inspect exactly what a layout drew.

use crate::font::FontContext;
use crate::style::{Color, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// The overlap of two rects, or `None` when they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let rect = Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (rect.right >= rect.left && rect.bottom >= rect.top).then_some(rect)
    }

    /// Is `other` inside this rect, allowing `tolerance` of float slack?
    pub fn contains(&self, other: &Rect, tolerance: f64) -> bool {
        other.left >= self.left - tolerance
            && other.top >= self.top - tolerance
            && other.right <= self.right + tolerance
            && other.bottom <= self.bottom + tolerance
    }
}

/// How to paint a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub fill: bool,
    /// Stroke line width; `None` means no stroke.
    pub stroke: Option<f64>,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self {
            color,
            fill: true,
            stroke: None,
        }
    }

    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            color,
            fill: false,
            stroke: Some(width),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Close,
}

/// An abstract drawing surface.
pub trait Canvas {
    /// Start a new page; subsequent calls draw on it.
    fn begin_page(&mut self, width: f64, height: f64);

    /// Draw `text` with its baseline starting at (`x`, `y`).
    fn draw_text(&mut self, style: &Style, text: &str, x: f64, y: f64);

    fn draw_rect(&mut self, rect: Rect, paint: Paint);

    fn draw_path(&mut self, segments: &[PathSegment], paint: Paint);

    /// Restrict later drawing to `rect` (intersected with any enclosing
    /// clip) until the matching [`pop_clip`](Canvas::pop_clip).
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);
}

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginPage {
        width: f64,
        height: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        font_size: f64,
        color: Color,
        /// Glyph box: measured advance, ascender to descender.
        extent: Rect,
    },
    Rect {
        rect: Rect,
        paint: Paint,
    },
    Path {
        segments: Vec<PathSegment>,
        paint: Paint,
    },
    PushClip {
        rect: Rect,
    },
    PopClip,
}

impl DrawOp {
    /// Area covered by this op, ignoring clipping. Page breaks and clip
    /// changes report `None`.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            DrawOp::Rect { rect, paint } => {
                let half = paint.stroke.unwrap_or(0.0) / 2.0;
                Some(Rect {
                    left: rect.left - half,
                    top: rect.top - half,
                    right: rect.right + half,
                    bottom: rect.bottom + half,
                })
            }
            DrawOp::Path { segments, paint } => {
                let half = paint.stroke.unwrap_or(0.0) / 2.0;
                segments
                    .iter()
                    .filter_map(|s| match *s {
                        PathSegment::MoveTo(x, y) | PathSegment::LineTo(x, y) => {
                            Some(Rect::new(x - half, y - half, 2.0 * half, 2.0 * half))
                        }
                        PathSegment::Close => None,
                    })
                    .reduce(|a, b| a.union(&b))
            }
            DrawOp::Text { extent, .. } => Some(*extent),
            DrawOp::BeginPage { .. } | DrawOp::PushClip { .. } | DrawOp::PopClip => None,
        }
    }
}

/// A canvas that records every call, grouped by page.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
    fonts: FontContext,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of every `Text` op, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Ops drawn on page `index` (zero-based). Ops issued before the first
    /// `begin_page` belong to page 0.
    pub fn page_ops(&self, index: usize) -> Vec<&DrawOp> {
        let mut page = 0usize;
        let mut seen_begin = false;
        let mut out = Vec::new();
        for op in &self.ops {
            if let DrawOp::BeginPage { .. } = op {
                if seen_begin {
                    page += 1;
                }
                seen_begin = true;
                continue;
            }
            if page == index {
                out.push(op);
            }
        }
        out
    }

    pub fn page_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::BeginPage { .. }))
            .count()
    }

    /// Cumulative bounding box of everything visible: each op's extent cut
    /// down to the clip in force when it was drawn.
    pub fn bounds(&self) -> Option<Rect> {
        // `Some(None)` on top of the stack: the clip hides everything.
        let mut clips: Vec<Option<Rect>> = Vec::new();
        let mut total: Option<Rect> = None;
        for op in &self.ops {
            match op {
                DrawOp::BeginPage { .. } => clips.clear(),
                DrawOp::PushClip { rect } => {
                    let clip = match clips.last() {
                        None => Some(*rect),
                        Some(Some(outer)) => outer.intersect(rect),
                        Some(None) => None,
                    };
                    clips.push(clip);
                }
                DrawOp::PopClip => {
                    clips.pop();
                }
                _ => {
                    let Some(extent) = op.bounds() else { continue };
                    let visible = match clips.last() {
                        None => Some(extent),
                        Some(Some(clip)) => extent.intersect(clip),
                        Some(None) => None,
                    };
                    if let Some(visible) = visible {
                        total = Some(total.map_or(visible, |t| t.union(&visible)));
                    }
                }
            }
        }
        total
    }
}

impl Canvas for RecordingCanvas {
    fn begin_page(&mut self, width: f64, height: f64) {
        self.ops.push(DrawOp::BeginPage { width, height });
    }

    fn draw_text(&mut self, style: &Style, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font_size: style.font_size,
            color: style.color,
            extent: self.fonts.text_extent(text, style, x, y),
        });
    }

    fn draw_rect(&mut self, rect: Rect, paint: Paint) {
        self.ops.push(DrawOp::Rect { rect, paint });
    }

    fn draw_path(&mut self, segments: &[PathSegment], paint: Paint) {
        self.ops.push(DrawOp::Path {
            segments: segments.to_vec(),
            paint,
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        self.ops.push(DrawOp::PushClip { rect });
    }

    fn pop_clip(&mut self) {
        self.ops.push(DrawOp::PopClip);
    }
}
