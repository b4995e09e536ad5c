//! # Content Model
//!
//! The input representation for the layout engine: a strict tree of
//! [`ContentNode`]s. A node is either a [`Leaf`] with an intrinsic size (a
//! text run, a spacer, a fixed-size block) or a [`Composite`] that owns an
//! ordered list of children and an [`Arrangement`] saying how to pack them.
//!
//! Composites are assembled with a [`CompositeBuilder`] and sealed by
//! `build()`; after that their child list never changes. The one exception
//! is conceptual: a composite used as a pagination stream is *consumed*
//! incrementally through an external cursor (see `layout::flow`), but the
//! node itself stays untouched.

use serde::{Deserialize, Serialize};
use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::layout::constraint::ConstraintOverride;
use crate::layout::table::Table;
use crate::style::{Color, StyleOverride};

/// A node in the content tree.
#[derive(Debug, Clone)]
pub enum ContentNode {
    Leaf(Leaf),
    Composite(Composite),
}

/// Atomic content with an intrinsic size. Never split across pages.
#[derive(Debug, Clone)]
pub struct Leaf {
    pub content: LeafContent,
    pub style: StyleOverride,
    pub constraint: ConstraintOverride,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeafContent {
    /// A single run of text, measured with the effective style.
    Text(String),
    /// Empty space of a fixed size.
    Spacer { width: f64, height: f64 },
    /// A fixed-size rectangle, filled and/or stroked.
    Block {
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    },
    /// Ends the current line of a reading flow. Zero-sized everywhere else.
    LineBreak,
}

/// How a composite packs its children.
#[derive(Debug, Clone)]
pub enum Arrangement {
    /// All children share the composite's origin; size is the max over children.
    Stack,
    /// Top to bottom, `gap` points between children.
    Vertical { gap: f64 },
    /// Left to right, wrapping to a new line when the next child would not
    /// fit. When `spaced`, children are separated by the width of a space.
    Reading { spaced: bool, line_gap: f64 },
    /// A vertical flow poured through `columns` equal-width columns.
    MultiColumn { columns: usize, gap: f64 },
    /// A rectangular grid; children are the cells in row-major order.
    Table(Box<Table>),
}

impl Arrangement {
    pub fn name(&self) -> &'static str {
        match self {
            Arrangement::Stack => "Stack",
            Arrangement::Vertical { .. } => "Vertical",
            Arrangement::Reading { .. } => "Reading",
            Arrangement::MultiColumn { .. } => "MultiColumn",
            Arrangement::Table(_) => "Table",
        }
    }
}

/// Background and border drawn behind a composite's children.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    pub background: Option<Color>,
    pub border: Option<(Color, f64)>,
}

/// A sealed container node. Build one with [`Composite::builder`].
#[derive(Debug, Clone)]
pub struct Composite {
    arrangement: Arrangement,
    children: Vec<ContentNode>,
    pub style: StyleOverride,
    pub constraint: ConstraintOverride,
    pub padding: Edges,
    pub frame: Frame,
    splittable: bool,
}

impl Composite {
    pub fn builder(arrangement: Arrangement) -> CompositeBuilder {
        CompositeBuilder {
            inner: Composite {
                arrangement,
                children: Vec::new(),
                style: StyleOverride::default(),
                constraint: ConstraintOverride::default(),
                padding: Edges::default(),
                frame: Frame::default(),
                splittable: true,
            },
        }
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn children(&self) -> &[ContentNode] {
        &self.children
    }

    /// Can pagination break this composite between two of its children?
    pub fn is_splittable(&self) -> bool {
        self.splittable
            && matches!(
                self.arrangement,
                Arrangement::Vertical { .. } | Arrangement::MultiColumn { .. }
            )
    }
}

/// Mutable-until-sealed construction of a [`Composite`].
#[derive(Debug, Clone)]
pub struct CompositeBuilder {
    inner: Composite,
}

impl CompositeBuilder {
    pub fn push(&mut self, child: ContentNode) -> &mut Self {
        self.inner.children.push(child);
        self
    }

    pub fn child(mut self, child: ContentNode) -> Self {
        self.inner.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ContentNode>) -> Self {
        self.inner.children.extend(children);
        self
    }

    pub fn style(mut self, style: StyleOverride) -> Self {
        self.inner.style = style;
        self
    }

    pub fn constraint(mut self, constraint: ConstraintOverride) -> Self {
        self.inner.constraint = constraint;
        self
    }

    pub fn padding(mut self, padding: Edges) -> Self {
        self.inner.padding = padding;
        self
    }

    pub fn frame(mut self, frame: Frame) -> Self {
        self.inner.frame = frame;
        self
    }

    /// Keep this composite on one page even if its arrangement could split.
    pub fn unsplittable(mut self) -> Self {
        self.inner.splittable = false;
        self
    }

    pub fn len(&self) -> usize {
        self.inner.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.children.is_empty()
    }

    /// Seal the composite. Its children are fixed from here on.
    pub fn build(self) -> ContentNode {
        ContentNode::Composite(self.inner)
    }
}

impl ContentNode {
    fn leaf(content: LeafContent) -> Self {
        ContentNode::Leaf(Leaf {
            content,
            style: StyleOverride::default(),
            constraint: ConstraintOverride::default(),
        })
    }

    pub fn text(content: &str) -> Self {
        Self::leaf(LeafContent::Text(content.to_string()))
    }

    pub fn styled_text(content: &str, style: StyleOverride) -> Self {
        Self::text(content).with_style(style)
    }

    pub fn spacer(width: f64, height: f64) -> Self {
        Self::leaf(LeafContent::Spacer { width, height })
    }

    pub fn block(width: f64, height: f64, fill: Option<Color>) -> Self {
        Self::leaf(LeafContent::Block {
            width,
            height,
            fill,
            stroke: None,
        })
    }

    pub fn line_break() -> Self {
        Self::leaf(LeafContent::LineBreak)
    }

    pub fn vertical(children: Vec<ContentNode>) -> Self {
        Composite::builder(Arrangement::Vertical { gap: 0.0 })
            .children(children)
            .build()
    }

    pub fn stack(children: Vec<ContentNode>) -> Self {
        Composite::builder(Arrangement::Stack).children(children).build()
    }

    pub fn reading(children: Vec<ContentNode>) -> Self {
        Composite::builder(Arrangement::Reading {
            spaced: false,
            line_gap: 0.0,
        })
        .children(children)
        .build()
    }

    pub fn columns(columns: usize, gap: f64, children: Vec<ContentNode>) -> Self {
        Composite::builder(Arrangement::MultiColumn { columns, gap })
            .children(children)
            .build()
    }

    /// A word-wrapped paragraph: one text leaf per word, in a spaced reading
    /// flow. Words are cut at UAX#14 break opportunities; mandatory breaks
    /// (newlines) become explicit line-break leaves.
    pub fn paragraph(text: &str, style: StyleOverride) -> Self {
        let mut builder = Composite::builder(Arrangement::Reading {
            spaced: true,
            line_gap: 0.0,
        })
        .style(style);

        let mut start = 0;
        for (end, opportunity) in linebreaks(text) {
            let word = text[start..end].trim();
            if !word.is_empty() {
                builder.push(ContentNode::text(word));
            }
            if opportunity == BreakOpportunity::Mandatory && end < text.len() {
                builder.push(ContentNode::line_break());
            }
            start = end;
        }
        builder.build()
    }

    pub fn with_style(mut self, style: StyleOverride) -> Self {
        match &mut self {
            ContentNode::Leaf(leaf) => leaf.style = style,
            ContentNode::Composite(c) => c.style = style,
        }
        self
    }

    pub fn with_constraint(mut self, constraint: ConstraintOverride) -> Self {
        match &mut self {
            ContentNode::Leaf(leaf) => leaf.constraint = constraint,
            ContentNode::Composite(c) => c.constraint = constraint,
        }
        self
    }

    pub fn style(&self) -> &StyleOverride {
        match self {
            ContentNode::Leaf(leaf) => &leaf.style,
            ContentNode::Composite(c) => &c.style,
        }
    }

    pub fn constraint(&self) -> &ConstraintOverride {
        match self {
            ContentNode::Leaf(leaf) => &leaf.constraint,
            ContentNode::Composite(c) => &c.constraint,
        }
    }

    pub fn is_splittable(&self) -> bool {
        match self {
            ContentNode::Leaf(_) => false,
            ContentNode::Composite(c) => c.is_splittable(),
        }
    }

    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Leaf(_) => &[],
            ContentNode::Composite(c) => c.children(),
        }
    }

    /// All text in this subtree, leaves in document order, joined by spaces.
    pub fn plain_text(&self) -> String {
        let mut words = Vec::new();
        self.collect_text(&mut words);
        words.join(" ")
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            ContentNode::Leaf(Leaf {
                content: LeafContent::Text(t),
                ..
            }) => out.push(t),
            ContentNode::Leaf(_) => {}
            ContentNode::Composite(c) => {
                for child in &c.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

// ── Pages ──────────────────────────────────────────────────────

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// Configuration for pagination: page size, margins, and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default)]
    pub size: PageSize,

    /// Page margins in points (1/72 inch).
    #[serde(default = "default_margin")]
    pub margin: Edges,

    /// Stop after this many pages, reporting the rest as truncated.
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// Place oversized unsplittable content clamped to the page instead of
    /// skipping it.
    #[serde(default)]
    pub clamp_oversized: bool,

    /// Footer line drawn on every page. `{page}` and `{pages}` are replaced
    /// with the page number and the page count.
    #[serde(default)]
    pub footer: Option<String>,
}

fn default_margin() -> Edges {
    Edges::uniform(54.0) // ~0.75 inch
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: default_margin(),
            max_pages: None,
            clamp_oversized: false,
            footer: None,
        }
    }
}

impl PageConfig {
    /// (width, height) of the area inside the margins.
    pub fn content_size(&self) -> (f64, f64) {
        let (w, h) = self.size.dimensions();
        (
            (w - self.margin.horizontal()).max(0.0),
            (h - self.margin.vertical()).max(0.0),
        )
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for margins and padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}
