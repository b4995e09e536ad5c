//! # Layout Engine
//!
//! Two passes over a [`ContentNode`] tree, depth first:
//!
//! 1. **fill**: given an inherited [`Style`] and [`Constraint`], measure
//!    leaves, pack composites, and return an immutable [`PlacedNode`] whose
//!    children carry offsets relative to their parent's origin.
//! 2. **draw**: walk a node together with its placement and issue primitive
//!    calls against a [`Canvas`]. Drawing never changes a placement, and can
//!    happen long after filling (a page is usually filled completely before
//!    any of it is drawn).
//!
//! Filling never overflows: every child is offered only the space that is
//! still free along the packing axis, and a node larger than what it is
//! offered is clamped to it. A constraint marked non-shrinkable turns that
//! clamp into [`LayoutError::OverflowUnsplittable`].
//!
//! Pagination builds on the same packing code through a resumable variant of
//! fill (see [`flow`]) that stops at the bottom of an area and reports where
//! to continue.

pub mod constraint;
pub mod flow;
pub mod lines;
pub mod page_break;
pub mod paginate;
pub mod table;

use std::ops::Range;

pub use constraint::{Constraint, ConstraintOverride, HAlign, VAlign, UNBOUNDED};
pub use flow::{FlowOptions, Fragment, StreamCursor};
pub use paginate::{Document, Footer, Page, PaginationState, Paginator, PlacedFrame};
pub use table::{EdgeMap, EdgeSlot, EdgeStyle, Side, Table, TableBuilder};

use constraint::EPSILON;
use crate::canvas::{Canvas, Paint, Rect};
use crate::error::LayoutError;
use crate::font::FontContext;
use crate::model::*;
use crate::style::Style;
use lines::LineItem;

/// The result of filling one node: its size, and for composites, where each
/// child went.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub width: f64,
    pub height: f64,
    pub kind: PlacedKind,
    /// Effective style, kept for drawing.
    pub style: Style,
    pub children: Vec<PlacedChild>,
}

/// Which shape of node a placement was produced for.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacedKind {
    Leaf,
    Stack,
    Vertical,
    Reading,
    MultiColumn,
    Table(table::TableGeometry),
}

impl PlacedKind {
    fn matches(&self, arrangement: &Arrangement) -> bool {
        matches!(
            (self, arrangement),
            (PlacedKind::Stack, Arrangement::Stack)
                | (PlacedKind::Vertical, Arrangement::Vertical { .. })
                | (PlacedKind::Reading, Arrangement::Reading { .. })
                | (PlacedKind::MultiColumn, Arrangement::MultiColumn { .. })
                | (PlacedKind::Table(_), Arrangement::Table(_))
        )
    }
}

/// A placed child: `index` into the parent's children, offset from the
/// parent's origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedChild {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub node: PlacedNode,
}

impl PlacedNode {
    /// Indices of the placed children, in placement order.
    pub fn child_indices(&self) -> Vec<usize> {
        self.children.iter().map(|c| c.index).collect()
    }
}

/// Output of an arrangement's packing step, before padding and alignment.
#[derive(Debug)]
pub(crate) struct Packed {
    pub width: f64,
    pub height: f64,
    pub children: Vec<PlacedChild>,
    /// Groups of children aligned horizontally as a unit.
    pub rows: Vec<PackedRow>,
    pub kind: PlacedKind,
    /// Align every child vertically on its own (stacks) rather than the
    /// whole block at once.
    pub align_each: bool,
}

#[derive(Debug)]
pub(crate) struct PackedRow {
    pub range: Range<usize>,
    pub width: f64,
}

impl Packed {
    pub(crate) fn empty(kind: PlacedKind) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            children: Vec::new(),
            rows: Vec::new(),
            kind,
            align_each: false,
        }
    }

    /// Append a child that forms its own alignment row.
    pub(crate) fn push_row(&mut self, child: PlacedChild) {
        let start = self.children.len();
        self.width = self.width.max(child.x + child.node.width);
        self.height = self.height.max(child.y + child.node.height);
        self.rows.push(PackedRow {
            range: start..start + 1,
            width: child.node.width,
        });
        self.children.push(child);
    }
}

/// The main layout engine.
#[derive(Default)]
pub struct LayoutEngine {
    fonts: FontContext,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fonts(&self) -> &FontContext {
        &self.fonts
    }

    /// Measure and position `node` within `inherited`.
    pub fn fill(
        &self,
        node: &ContentNode,
        inherited_style: &Style,
        inherited: &Constraint,
    ) -> Result<PlacedNode, LayoutError> {
        match node {
            ContentNode::Leaf(leaf) => self.fill_leaf(leaf, inherited_style, inherited),
            ContentNode::Composite(composite) => {
                let style = composite.style.resolve(inherited_style);
                let constraint = composite.constraint.resolve(inherited);
                let inner = inner_constraint(&constraint, &composite.padding);
                let children = composite.children();

                let packed = match composite.arrangement() {
                    Arrangement::Stack => self.pack_stack(children, &style, &inner)?,
                    Arrangement::Vertical { gap } => {
                        self.pack_vertical(children, 0, &style, &inner, *gap)?
                    }
                    Arrangement::Reading { spaced, line_gap } => {
                        self.pack_reading(children, &style, &inner, *spaced, *line_gap)?
                    }
                    Arrangement::MultiColumn { columns, gap } => {
                        self.pack_columns(children, &style, &inner, *columns, *gap)?
                    }
                    Arrangement::Table(t) => table::pack_table(self, t, children, &style, &inner)?,
                };

                Ok(finish(composite, style, &constraint, packed))
            }
        }
    }

    fn fill_leaf(
        &self,
        leaf: &Leaf,
        inherited_style: &Style,
        inherited: &Constraint,
    ) -> Result<PlacedNode, LayoutError> {
        let style = leaf.style.resolve(inherited_style);
        let constraint = leaf.constraint.resolve(inherited);
        let (width, height) = self.intrinsic_size(&leaf.content, &style);

        if !constraint.shrinkable && constraint.exceeded_by(width, height) {
            return Err(LayoutError::OverflowUnsplittable {
                width,
                height,
                max_width: constraint.max_width,
                max_height: constraint.max_height,
            });
        }

        Ok(PlacedNode {
            width: width.min(constraint.max_width).max(0.0),
            height: height.min(constraint.max_height).max(0.0),
            kind: PlacedKind::Leaf,
            style,
            children: Vec::new(),
        })
    }

    /// Natural size of leaf content in `style`.
    pub fn intrinsic_size(&self, content: &LeafContent, style: &Style) -> (f64, f64) {
        match content {
            LeafContent::Text(text) => (self.fonts.measure_string(text, style), style.line_box()),
            LeafContent::Spacer { width, height } | LeafContent::Block { width, height, .. } => {
                (width.max(0.0), height.max(0.0))
            }
            LeafContent::LineBreak => (0.0, 0.0),
        }
    }

    /// Narrowest width `node` can take without squeezing any leaf below
    /// its natural width. Reading flows wrap between children; tables shrink
    /// their cells and lines and set no floor of their own.
    pub fn min_content_width(&self, node: &ContentNode, inherited_style: &Style) -> f64 {
        match node {
            ContentNode::Leaf(leaf) => {
                let style = leaf.style.resolve(inherited_style);
                self.intrinsic_size(&leaf.content, &style).0
            }
            ContentNode::Composite(composite) => {
                let style = composite.style.resolve(inherited_style);
                let widest = || {
                    composite
                        .children()
                        .iter()
                        .map(|child| self.min_content_width(child, &style))
                        .fold(0.0, f64::max)
                };
                let content = match composite.arrangement() {
                    Arrangement::Table(_) => 0.0,
                    Arrangement::MultiColumn { columns, gap } => {
                        let n = (*columns).max(1);
                        widest() * n as f64 + gap * (n - 1) as f64
                    }
                    Arrangement::Stack | Arrangement::Vertical { .. } | Arrangement::Reading { .. } => {
                        widest()
                    }
                };
                content + composite.padding.horizontal()
            }
        }
    }

    // ── Packing ────────────────────────────────────────────────

    fn pack_stack(
        &self,
        children: &[ContentNode],
        style: &Style,
        inner: &Constraint,
    ) -> Result<Packed, LayoutError> {
        let mut packed = Packed::empty(PlacedKind::Stack);
        packed.align_each = true;
        for (index, child) in children.iter().enumerate() {
            let node = self.fill(child, style, inner)?;
            packed.push_row(PlacedChild {
                index,
                x: 0.0,
                y: 0.0,
                node,
            });
        }
        Ok(packed)
    }

    /// Pack `children` top to bottom. `first_index` is the index of
    /// `children[0]` within the owning composite.
    pub(crate) fn pack_vertical(
        &self,
        children: &[ContentNode],
        first_index: usize,
        style: &Style,
        inner: &Constraint,
        gap: f64,
    ) -> Result<Packed, LayoutError> {
        let mut packed = Packed::empty(PlacedKind::Vertical);
        let mut y = 0.0_f64;
        for (offset, child) in children.iter().enumerate() {
            if offset > 0 {
                y = (y + gap).min(inner.max_height);
            }
            let node = self.fill(child, style, &inner.with_max_height(inner.max_height - y))?;
            let height = node.height;
            packed.push_row(PlacedChild {
                index: first_index + offset,
                x: 0.0,
                y,
                node,
            });
            y += height;
        }
        packed.height = y;
        Ok(packed)
    }

    fn pack_reading(
        &self,
        children: &[ContentNode],
        style: &Style,
        inner: &Constraint,
        spaced: bool,
        line_gap: f64,
    ) -> Result<Packed, LayoutError> {
        let gap = if spaced { self.fonts.space_width(style) } else { 0.0 };

        let mut nodes = children
            .iter()
            .map(|child| self.fill(child, style, inner))
            .collect::<Result<Vec<_>, _>>()?;
        let items: Vec<LineItem> = children
            .iter()
            .zip(&nodes)
            .map(|(child, node)| LineItem {
                width: node.width,
                line_break: matches!(
                    child,
                    ContentNode::Leaf(Leaf {
                        content: LeafContent::LineBreak,
                        ..
                    })
                ),
            })
            .collect();

        let mut packed = Packed::empty(PlacedKind::Reading);
        let mut y = 0.0_f64;
        for (n, line) in lines::partition_into_lines(&items, gap, inner.max_width)
            .into_iter()
            .enumerate()
        {
            if n > 0 {
                y = (y + line_gap).min(inner.max_height);
            }
            let remaining = inner.max_height - y;
            let mut line_height = nodes[line.start..line.end]
                .iter()
                .map(|node| node.height)
                .fold(0.0, f64::max);
            if line_height > remaining {
                // Out of room: re-offer this line only what is left.
                let squeezed = inner.with_max_height(remaining);
                for i in line.start..line.end {
                    nodes[i] = self.fill(&children[i], style, &squeezed)?;
                }
                line_height = remaining.max(0.0);
            }

            let row_start = packed.children.len();
            let mut x = 0.0;
            for i in line.start..line.end {
                if i > line.start && !items[i].line_break {
                    x += gap;
                }
                let node = nodes[i].clone();
                let child_y = y + line_height - node.height;
                let width = node.width;
                packed.children.push(PlacedChild {
                    index: i,
                    x,
                    y: child_y,
                    node,
                });
                x += width;
            }
            packed.rows.push(PackedRow {
                range: row_start..packed.children.len(),
                width: line.width,
            });
            packed.width = packed.width.max(line.width);
            y += line_height;
        }
        packed.height = y;
        Ok(packed)
    }

    /// Multi-column without a cursor: balance children across columns.
    fn pack_columns(
        &self,
        children: &[ContentNode],
        style: &Style,
        inner: &Constraint,
        columns: usize,
        gap: f64,
    ) -> Result<Packed, LayoutError> {
        let columns = columns.max(1);
        let column = column_constraint(inner, columns, gap);

        let heights = children
            .iter()
            .map(|child| {
                self.fill(child, style, &column.with_max_height(UNBOUNDED))
                    .map(|node| node.height)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let packed_columns = lines::balance_columns(&heights, columns)
            .into_iter()
            .map(|range| self.pack_vertical(&children[range.clone()], range.start, style, &column, 0.0))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(merge_columns(packed_columns, inner, columns, gap))
    }

    // ── Drawing ────────────────────────────────────────────────

    /// Draw `node` using a placement previously produced for it, with the
    /// node's top-left corner at (`left`, `top`).
    pub fn draw(
        &self,
        node: &ContentNode,
        placed: &PlacedNode,
        canvas: &mut dyn Canvas,
        left: f64,
        top: f64,
    ) -> Result<(), LayoutError> {
        match node {
            ContentNode::Leaf(leaf) => {
                if placed.kind != PlacedKind::Leaf || !placed.children.is_empty() {
                    return Err(LayoutError::mismatch(format!(
                        "leaf drawn with a {:?} placement",
                        placed.kind
                    )));
                }
                self.draw_leaf(&leaf.content, placed, canvas, left, top);
                Ok(())
            }
            ContentNode::Composite(composite) => {
                if !placed.kind.matches(composite.arrangement()) {
                    return Err(LayoutError::mismatch(format!(
                        "{} composite drawn with a {:?} placement",
                        composite.arrangement().name(),
                        placed.kind
                    )));
                }

                draw_frame(&composite.frame, placed, canvas, left, top);

                let mut previous = 0;
                for child in &placed.children {
                    if child.index < previous {
                        return Err(LayoutError::mismatch(format!(
                            "child {} placed after child {previous}",
                            child.index
                        )));
                    }
                    previous = child.index;
                    let content = composite.children().get(child.index).ok_or_else(|| {
                        LayoutError::mismatch(format!(
                            "placement refers to child {} of {}",
                            child.index,
                            composite.children().len()
                        ))
                    })?;
                    self.draw(content, &child.node, canvas, left + child.x, top + child.y)?;
                }

                if let (Arrangement::Table(t), PlacedKind::Table(geometry)) =
                    (composite.arrangement(), &placed.kind)
                {
                    table::draw_edges(t, geometry, canvas, left, top);
                }
                Ok(())
            }
        }
    }

    fn draw_leaf(
        &self,
        content: &LeafContent,
        placed: &PlacedNode,
        canvas: &mut dyn Canvas,
        left: f64,
        top: f64,
    ) {
        if placed.width <= 0.0 || placed.height <= 0.0 {
            return;
        }
        let style = &placed.style;
        match content {
            LeafContent::Text(text) => {
                let baseline = top + self.fonts.baseline_offset(style);
                let glyphs = self.fonts.text_extent(text, style, left, baseline);
                let thickness = style.font_size * 0.05;
                let decoration = |offset: f64| {
                    Rect::new(left, baseline + style.font_size * offset, glyphs.width(), thickness)
                };
                let mut decorations = Vec::new();
                if style.underline {
                    decorations.push(decoration(0.1));
                }
                if style.strikethrough {
                    decorations.push(decoration(-0.3));
                }

                // Text squeezed below its natural size is cut at the placed box.
                let area = Rect::new(left, top, placed.width, placed.height);
                let extent = decorations.iter().fold(glyphs, |acc, r| acc.union(r));
                let clipped = !area.contains(&extent, EPSILON);
                if clipped {
                    canvas.push_clip(area);
                }
                canvas.draw_text(style, text, left, baseline);
                for rect in decorations {
                    canvas.draw_rect(rect, Paint::fill(style.color));
                }
                if clipped {
                    canvas.pop_clip();
                }
            }
            LeafContent::Block { fill, stroke, .. } => {
                let bounds = Rect::new(left, top, placed.width, placed.height);
                if let Some(color) = fill {
                    canvas.draw_rect(bounds, Paint::fill(*color));
                }
                if let Some((color, width)) = stroke {
                    draw_inset_border(canvas, bounds, *color, *width);
                }
            }
            LeafContent::Spacer { .. } | LeafContent::LineBreak => {}
        }
    }
}

/// Constraint for the content box inside `padding`.
fn inner_constraint(constraint: &Constraint, padding: &Edges) -> Constraint {
    constraint.with_max(
        constraint.max_width - padding.horizontal(),
        constraint.max_height - padding.vertical(),
    )
}

/// Constraint for one of `columns` equal columns inside `inner`.
pub(crate) fn column_constraint(inner: &Constraint, columns: usize, gap: f64) -> Constraint {
    let width = if inner.width_bounded() {
        (inner.max_width - gap * (columns - 1) as f64) / columns as f64
    } else {
        UNBOUNDED
    };
    inner.with_max(width, inner.max_height)
}

/// Lay packed columns side by side.
pub(crate) fn merge_columns(
    columns: Vec<Packed>,
    inner: &Constraint,
    count: usize,
    gap: f64,
) -> Packed {
    let column_width = if inner.width_bounded() {
        column_constraint(inner, count, gap).max_width
    } else {
        columns.iter().map(|c| c.width).fold(0.0, f64::max)
    };
    let used = if inner.width_bounded() { count } else { columns.len() };

    let mut merged = Packed::empty(PlacedKind::MultiColumn);
    for (k, column) in columns.into_iter().enumerate() {
        let dx = k as f64 * (column_width + gap);
        merged.height = merged.height.max(column.height);
        merged
            .children
            .extend(column.children.into_iter().map(|mut child| {
                child.x += dx;
                child
            }));
    }
    merged.width = if used == 0 {
        0.0
    } else {
        used as f64 * column_width + (used - 1) as f64 * gap
    };
    merged.rows.push(PackedRow {
        range: 0..merged.children.len(),
        width: merged.width,
    });
    merged
}

/// Apply padding, sizing, and alignment to packed children.
pub(crate) fn finish(
    composite: &Composite,
    style: Style,
    constraint: &Constraint,
    mut packed: Packed,
) -> PlacedNode {
    let padding = &composite.padding;
    let (width, height) = constraint.container_size(
        packed.width + padding.horizontal(),
        packed.height + padding.vertical(),
    );
    let inner_w = width - padding.horizontal();
    let inner_h = height - padding.vertical();
    let block_dy = constraint.valign.offset(inner_h - packed.height);

    for row in &packed.rows {
        let dx = constraint.halign.offset(inner_w - row.width);
        for child in &mut packed.children[row.range.clone()] {
            child.x += padding.left + dx;
            child.y += padding.top
                + if packed.align_each {
                    constraint.valign.offset(inner_h - child.node.height)
                } else {
                    block_dy
                };
        }
    }

    if let PlacedKind::Table(geometry) = &mut packed.kind {
        let dx = constraint.halign.offset(inner_w - packed.width);
        geometry.shift(padding.left + dx, padding.top + block_dy);
    }

    PlacedNode {
        width,
        height,
        kind: packed.kind,
        style,
        children: packed.children,
    }
}

fn draw_frame(frame: &Frame, placed: &PlacedNode, canvas: &mut dyn Canvas, left: f64, top: f64) {
    if placed.width <= 0.0 || placed.height <= 0.0 {
        return;
    }
    let bounds = Rect::new(left, top, placed.width, placed.height);
    if let Some(background) = frame.background {
        canvas.draw_rect(bounds, Paint::fill(background));
    }
    if let Some((color, width)) = frame.border {
        draw_inset_border(canvas, bounds, color, width);
    }
}

/// Stroke a border whose outer edge lies on `bounds`.
fn draw_inset_border(canvas: &mut dyn Canvas, bounds: Rect, color: crate::style::Color, width: f64) {
    let width = width.min(bounds.width()).min(bounds.height());
    if width <= 0.0 {
        return;
    }
    let half = width / 2.0;
    let rect = Rect {
        left: bounds.left + half,
        top: bounds.top + half,
        right: bounds.right - half,
        bottom: bounds.bottom - half,
    };
    canvas.draw_rect(rect, Paint::stroke(color, width));
}
