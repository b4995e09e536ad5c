//! # Table Layout
//!
//! A table is a composite whose children are its cells in row-major order.
//! Columns and rows are sized from the cells' natural sizes:
//!
//! 1. Fill every cell once with no width or height limit.
//! 2. Column `c` gets `max over rows (natural width + left/right padding)`
//!    plus the thicker of its two bordering vertical edges. Rows likewise.
//! 3. If the table is wider (taller) than its constraint, the content part
//!    of the columns (rows) shrinks proportionally; borders never shrink.
//! 4. Fill every cell again at exactly its allotted size.
//!
//! Border bands are centred on the grid lines, and the outer bands lie
//! inside the table: with `b` the thickness per grid line, line 0 sits at
//! `b[0] / 2` and the table ends at `line[C] + b[C] / 2`.
//!
//! Which edges get drawn is decided per edge by an optional [`EdgeMap`];
//! without one, every edge of non-zero thickness is drawn solid.

use serde::{Deserialize, Serialize};

use super::constraint::{Constraint, UNBOUNDED};
use super::lines::shrink_proportionally;
use super::{LayoutEngine, Packed, PackedRow, PlacedChild, PlacedKind};
use crate::canvas::{Canvas, Paint, PathSegment, Rect};
use crate::error::LayoutError;
use crate::layout::constraint::ConstraintOverride;
use crate::model::{Arrangement, Composite, ContentNode, Edges};
use crate::style::{Color, Style, StyleOverride};

/// Fraction of an edge covered by each of the two marks of an `Open` edge.
const OPEN_MARK: f64 = 0.2;

/// Identifies one grid line when asking for its thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeSlot {
    /// Grid line index: `0..=columns` for vertical lines, `0..=rows` for
    /// horizontal ones.
    pub index: usize,
    /// A vertical line (between columns) rather than a horizontal one.
    pub vertical: bool,
    /// The first or last line on its axis, i.e. the table's outline.
    pub outer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// How a single table edge is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeStyle {
    #[default]
    None,
    /// A solid band the whole length of the edge.
    Full,
    /// Two short marks at the ends of the edge, nothing in between.
    Open,
}

/// Per-edge styles for an `rows x columns` grid.
///
/// Vertical edge `(r, c)` is the left side of cell `(r, c)`, with
/// `c` in `0..=columns`. Horizontal edge `(r, c)` is the top of cell
/// `(r, c)`, with `r` in `0..=rows`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap {
    rows: usize,
    columns: usize,
    vertical: Vec<EdgeStyle>,
    horizontal: Vec<EdgeStyle>,
}

impl EdgeMap {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            vertical: vec![EdgeStyle::None; rows * (columns + 1)],
            horizontal: vec![EdgeStyle::None; (rows + 1) * columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn vertical_index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col <= self.columns).then(|| row * (self.columns + 1) + col)
    }

    fn horizontal_index(&self, row: usize, col: usize) -> Option<usize> {
        (row <= self.rows && col < self.columns).then(|| row * self.columns + col)
    }

    pub fn vertical(&self, row: usize, col: usize) -> EdgeStyle {
        self.vertical_index(row, col)
            .map_or(EdgeStyle::None, |i| self.vertical[i])
    }

    pub fn horizontal(&self, row: usize, col: usize) -> EdgeStyle {
        self.horizontal_index(row, col)
            .map_or(EdgeStyle::None, |i| self.horizontal[i])
    }

    /// Out-of-range edges are ignored.
    pub fn set_vertical(&mut self, row: usize, col: usize, style: EdgeStyle) {
        if let Some(i) = self.vertical_index(row, col) {
            self.vertical[i] = style;
        }
    }

    pub fn set_horizontal(&mut self, row: usize, col: usize, style: EdgeStyle) {
        if let Some(i) = self.horizontal_index(row, col) {
            self.horizontal[i] = style;
        }
    }
}

/// Table configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: usize,
    columns: usize,
    /// Thickness per vertical grid line, `columns + 1` entries.
    column_borders: Vec<f64>,
    /// Thickness per horizontal grid line, `rows + 1` entries.
    row_borders: Vec<f64>,
    /// Per-cell padding, row-major.
    padding: Vec<Edges>,
    border_color: Color,
    edges: Option<EdgeMap>,
}

impl Table {
    pub fn builder(rows: usize, columns: usize) -> TableBuilder {
        TableBuilder {
            rows,
            columns,
            cells: Vec::new(),
            thickness: Box::new(|_| 1.0),
            padding: Box::new(|_, _, _| 0.0),
            border_color: Color::BLACK,
            edges: None,
            style: StyleOverride::default(),
            constraint: ConstraintOverride::default(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn check_cells(&self, cells: usize) -> Result<(), LayoutError> {
        if cells == self.rows * self.columns {
            Ok(())
        } else {
            Err(LayoutError::InvalidTableShape {
                rows: self.rows,
                columns: self.columns,
                cells,
            })
        }
    }
}

type ThicknessFn = Box<dyn Fn(EdgeSlot) -> f64>;
type PaddingFn = Box<dyn Fn(usize, usize, Side) -> f64>;

/// Builds a table composite. Thickness and padding callbacks are evaluated
/// once, in `build`.
pub struct TableBuilder {
    rows: usize,
    columns: usize,
    cells: Vec<ContentNode>,
    thickness: ThicknessFn,
    padding: PaddingFn,
    border_color: Color,
    edges: Option<EdgeMap>,
    style: StyleOverride,
    constraint: ConstraintOverride,
}

impl TableBuilder {
    /// Generate the cells from a `(row, column)` callback.
    pub fn cells_from(mut self, cell: impl Fn(usize, usize) -> ContentNode) -> Self {
        let columns = self.columns;
        self.cells = (0..self.rows)
            .flat_map(|r| (0..columns).map(move |c| (r, c)))
            .map(|(r, c)| cell(r, c))
            .collect();
        self
    }

    /// Supply the cells directly, row-major.
    pub fn cells(mut self, cells: Vec<ContentNode>) -> Self {
        self.cells = cells;
        self
    }

    pub fn border_thickness(mut self, thickness: impl Fn(EdgeSlot) -> f64 + 'static) -> Self {
        self.thickness = Box::new(thickness);
        self
    }

    pub fn uniform_border(self, thickness: f64) -> Self {
        self.border_thickness(move |_| thickness)
    }

    pub fn padding(mut self, padding: impl Fn(usize, usize, Side) -> f64 + 'static) -> Self {
        self.padding = Box::new(padding);
        self
    }

    pub fn uniform_padding(self, padding: f64) -> Self {
        self.padding(move |_, _, _| padding)
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    pub fn edges(mut self, edges: EdgeMap) -> Self {
        self.edges = Some(edges);
        self
    }

    pub fn style(mut self, style: StyleOverride) -> Self {
        self.style = style;
        self
    }

    pub fn constraint(mut self, constraint: ConstraintOverride) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn build(self) -> Result<ContentNode, LayoutError> {
        let (rows, columns) = (self.rows, self.columns);
        let thickness = |index: usize, vertical: bool, last: usize| {
            (self.thickness)(EdgeSlot {
                index,
                vertical,
                outer: index == 0 || index == last,
            })
            .max(0.0)
        };
        let padding = |r: usize, c: usize, side: Side| (self.padding)(r, c, side).max(0.0);

        let table = Table {
            rows,
            columns,
            column_borders: (0..=columns).map(|i| thickness(i, true, columns)).collect(),
            row_borders: (0..=rows).map(|i| thickness(i, false, rows)).collect(),
            padding: (0..rows)
                .flat_map(|r| (0..columns).map(move |c| (r, c)))
                .map(|(r, c)| Edges {
                    top: padding(r, c, Side::Top),
                    right: padding(r, c, Side::Right),
                    bottom: padding(r, c, Side::Bottom),
                    left: padding(r, c, Side::Left),
                })
                .collect(),
            border_color: self.border_color,
            edges: self.edges,
        };
        table.check_cells(self.cells.len())?;
        if let Some(edges) = &table.edges {
            if edges.rows != rows || edges.columns != columns {
                return Err(LayoutError::InvalidTableShape {
                    rows: edges.rows,
                    columns: edges.columns,
                    cells: self.cells.len(),
                });
            }
        }

        Ok(Composite::builder(Arrangement::Table(Box::new(table)))
            .children(self.cells)
            .style(self.style)
            .constraint(self.constraint)
            .build())
    }
}

/// Grid line positions of a placed table, relative to the table's origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGeometry {
    /// `columns + 1` vertical line positions.
    pub column_lines: Vec<f64>,
    /// `rows + 1` horizontal line positions.
    pub row_lines: Vec<f64>,
    /// Thickness of each vertical line as placed. Smaller than the table's
    /// own when the table had to shrink past its content.
    pub column_borders: Vec<f64>,
    pub row_borders: Vec<f64>,
}

impl TableGeometry {
    pub(crate) fn shift(&mut self, dx: f64, dy: f64) {
        self.column_lines.iter_mut().for_each(|x| *x += dx);
        self.row_lines.iter_mut().for_each(|y| *y += dy);
    }
}

/// Sizes along one axis: the line thicknesses, the per-track reserve for
/// those lines, and the flexible part that holds padding and content.
struct Track {
    borders: Vec<f64>,
    reserve: Vec<f64>,
    flexible: Vec<f64>,
}

impl Track {
    fn new(borders: &[f64], flexible: Vec<f64>) -> Self {
        let reserve = borders.windows(2).map(|w| w[0].max(w[1])).collect();
        Self {
            borders: borders.to_vec(),
            reserve,
            flexible,
        }
    }

    fn outer(&self) -> f64 {
        self.borders.first().copied().unwrap_or(0.0) / 2.0
            + self.borders.last().copied().unwrap_or(0.0) / 2.0
    }

    fn total(&self) -> f64 {
        self.outer() + self.reserve.iter().sum::<f64>() + self.flexible.iter().sum::<f64>()
    }

    /// Shrink the flexible parts so the whole axis fits in `limit`. Once
    /// they are gone, the lines themselves thin out.
    fn fit(&mut self, limit: f64) -> bool {
        let overflow = self.total() - limit;
        if overflow <= super::constraint::EPSILON {
            return false;
        }
        shrink_proportionally(&mut self.flexible, overflow);

        let lines = self.total();
        if lines > limit + super::constraint::EPSILON && lines > 0.0 {
            let scale = limit.max(0.0) / lines;
            self.borders.iter_mut().for_each(|b| *b *= scale);
            self.reserve.iter_mut().for_each(|r| *r *= scale);
        }
        true
    }

    fn lines(&self) -> Vec<f64> {
        let mut lines = Vec::with_capacity(self.flexible.len() + 1);
        let mut at = self.borders.first().copied().unwrap_or(0.0) / 2.0;
        lines.push(at);
        for (reserve, flexible) in self.reserve.iter().zip(&self.flexible) {
            at += reserve + flexible;
            lines.push(at);
        }
        lines
    }

    /// Offset of content inside track `i` and the room left for it once
    /// `before` and `after` padding is taken out. Padding gives way when
    /// the track is narrower than it.
    fn slot(&self, i: usize, before: f64, after: f64) -> (f64, f64) {
        let room = self.flexible[i];
        let lead = before.min(room);
        (self.reserve[i] / 2.0 + lead, (room - before - after).max(0.0))
    }
}

pub(crate) fn pack_table(
    engine: &LayoutEngine,
    table: &Table,
    cells: &[ContentNode],
    style: &Style,
    inner: &Constraint,
) -> Result<Packed, LayoutError> {
    table.check_cells(cells.len())?;
    let columns = table.columns;
    let cell_at = |r: usize, c: usize| r * columns + c;

    let natural_limit = inner.with_max(UNBOUNDED, UNBOUNDED);
    let natural = cells
        .iter()
        .map(|cell| engine.fill(cell, style, &natural_limit))
        .collect::<Result<Vec<_>, _>>()?;

    let mut widths = vec![0.0_f64; columns];
    let mut heights = vec![0.0_f64; table.rows];
    for r in 0..table.rows {
        for c in 0..columns {
            let (node, pad) = (&natural[cell_at(r, c)], &table.padding[cell_at(r, c)]);
            widths[c] = widths[c].max(node.width + pad.horizontal());
            heights[r] = heights[r].max(node.height + pad.vertical());
        }
    }

    let mut x_track = Track::new(&table.column_borders, widths);
    let mut y_track = Track::new(&table.row_borders, heights);
    let natural_size = (x_track.total(), y_track.total());
    let shrunk_x = inner.width_bounded() && x_track.fit(inner.max_width);
    let shrunk_y = inner.height_bounded() && y_track.fit(inner.max_height);
    if (shrunk_x || shrunk_y) && !inner.shrinkable {
        return Err(LayoutError::OverflowUnsplittable {
            width: natural_size.0,
            height: natural_size.1,
            max_width: inner.max_width,
            max_height: inner.max_height,
        });
    }

    let column_lines = x_track.lines();
    let row_lines = y_track.lines();

    let mut packed = Packed::empty(PlacedKind::Table(TableGeometry {
        column_lines: column_lines.clone(),
        row_lines: row_lines.clone(),
        column_borders: x_track.borders.clone(),
        row_borders: y_track.borders.clone(),
    }));
    for r in 0..table.rows {
        for c in 0..columns {
            let pad = &table.padding[cell_at(r, c)];
            let (dx, slot_w) = x_track.slot(c, pad.left, pad.right);
            let (dy, slot_h) = y_track.slot(r, pad.top, pad.bottom);
            let node = engine.fill(&cells[cell_at(r, c)], style, &inner.with_max(slot_w, slot_h))?;
            let x = column_lines[c] + dx + inner.halign.offset(slot_w - node.width);
            let y = row_lines[r] + dy + inner.valign.offset(slot_h - node.height);
            packed.children.push(PlacedChild {
                index: cell_at(r, c),
                x,
                y,
                node,
            });
        }
    }

    packed.width = column_lines.last().copied().unwrap_or(0.0)
        + x_track.borders.last().copied().unwrap_or(0.0) / 2.0;
    packed.height = row_lines.last().copied().unwrap_or(0.0)
        + y_track.borders.last().copied().unwrap_or(0.0) / 2.0;
    packed.rows.push(PackedRow {
        range: 0..packed.children.len(),
        width: packed.width,
    });
    Ok(packed)
}

/// Draw the table's edges over its (already drawn) cells.
pub(crate) fn draw_edges(
    table: &Table,
    geometry: &TableGeometry,
    canvas: &mut dyn Canvas,
    left: f64,
    top: f64,
) {
    let edges = table.edges.as_ref();
    let (xs, ys) = (&geometry.column_lines, &geometry.row_lines);
    let (bx, by) = (&geometry.column_borders, &geometry.row_borders);

    for r in 0..table.rows {
        for c in 0..=table.columns {
            let style = edges.map_or(EdgeStyle::Full, |m| m.vertical(r, c));
            let edge = Edge {
                vertical: true,
                at: left + xs[c],
                span: (top + ys[r] - by[r] / 2.0, top + ys[r + 1] + by[r + 1] / 2.0),
                thickness: bx[c],
            };
            edge.draw(canvas, style, table.border_color);
        }
    }
    for r in 0..=table.rows {
        for c in 0..table.columns {
            let style = edges.map_or(EdgeStyle::Full, |m| m.horizontal(r, c));
            let edge = Edge {
                vertical: false,
                at: top + ys[r],
                span: (left + xs[c] - bx[c] / 2.0, left + xs[c + 1] + bx[c + 1] / 2.0),
                thickness: by[r],
            };
            edge.draw(canvas, style, table.border_color);
        }
    }
}

/// One axis-aligned edge: centred on `at`, running over `span` (corner
/// squares included).
struct Edge {
    vertical: bool,
    at: f64,
    span: (f64, f64),
    thickness: f64,
}

impl Edge {
    fn point(&self, along: f64) -> (f64, f64) {
        if self.vertical {
            (self.at, along)
        } else {
            (along, self.at)
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas, style: EdgeStyle, color: Color) {
        if self.thickness <= 0.0 {
            return;
        }
        let half = self.thickness / 2.0;
        let (start, end) = self.span;
        match style {
            EdgeStyle::None => {}
            EdgeStyle::Full => {
                let (a, b) = (self.point(start), self.point(end));
                let rect = if self.vertical {
                    Rect {
                        left: a.0 - half,
                        top: a.1,
                        right: b.0 + half,
                        bottom: b.1,
                    }
                } else {
                    Rect {
                        left: a.0,
                        top: a.1 - half,
                        right: b.0,
                        bottom: b.1 + half,
                    }
                };
                canvas.draw_rect(rect, Paint::fill(color));
            }
            EdgeStyle::Open => {
                let (from, to) = (start + half, end - half);
                if to < from {
                    return;
                }
                let mark = (end - start) * OPEN_MARK;
                let (a0, a1) = (self.point(from), self.point((from + mark).min(to)));
                let (b0, b1) = (self.point((to - mark).max(from)), self.point(to));
                canvas.draw_path(
                    &[
                        PathSegment::MoveTo(a0.0, a0.1),
                        PathSegment::LineTo(a1.0, a1.1),
                        PathSegment::MoveTo(b0.0, b0.1),
                        PathSegment::LineTo(b1.0, b1.1),
                    ],
                    Paint::stroke(color, self.thickness),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};

    fn block(w: f64, h: f64) -> ContentNode {
        ContentNode::block(w, h, None)
    }

    fn fill(node: &ContentNode, constraint: Constraint) -> crate::layout::PlacedNode {
        LayoutEngine::new()
            .fill(node, &Style::default(), &constraint)
            .expect("fill succeeds")
    }

    fn geometry(placed: &crate::layout::PlacedNode) -> &TableGeometry {
        match &placed.kind {
            PlacedKind::Table(g) => g,
            other => panic!("not a table: {other:?}"),
        }
    }

    fn two_by_two(sizes: [(f64, f64); 4]) -> ContentNode {
        Table::builder(2, 2)
            .uniform_border(2.0)
            .cells(sizes.iter().map(|(w, h)| block(*w, *h)).collect())
            .build()
            .unwrap()
    }

    #[test]
    fn cell_count_must_match_shape() {
        let err = Table::builder(2, 2)
            .cells(vec![block(1.0, 1.0)])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidTableShape {
                rows: 2,
                columns: 2,
                cells: 1
            }
        );
    }

    #[test]
    fn edge_map_must_match_shape() {
        let err = Table::builder(1, 1)
            .cells(vec![block(1.0, 1.0)])
            .edges(EdgeMap::new(2, 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidTableShape { .. }));
    }

    #[test]
    fn natural_geometry() {
        // Column widths 10 and 20 plus a 2pt reserve each; borders centred.
        let table = two_by_two([(10.0, 5.0), (20.0, 5.0), (4.0, 8.0), (4.0, 1.0)]);
        let placed = fill(&table, Constraint::unbounded());
        let g = geometry(&placed);
        assert_eq!(g.column_lines, vec![1.0, 13.0, 35.0]);
        assert_eq!(g.row_lines, vec![1.0, 8.0, 18.0]);
        assert_eq!((placed.width, placed.height), (36.0, 19.0));

        let origins: Vec<(f64, f64)> = placed.children.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(origins, vec![(2.0, 2.0), (14.0, 2.0), (2.0, 9.0), (14.0, 9.0)]);
    }

    #[test]
    fn padding_is_added_per_cell() {
        let table = Table::builder(1, 2)
            .uniform_border(0.0)
            .padding(|_, c, side| if c == 1 && side == Side::Left { 3.0 } else { 0.0 })
            .cells(vec![block(5.0, 5.0), block(5.0, 5.0)])
            .build()
            .unwrap();
        let placed = fill(&table, Constraint::unbounded());
        assert_eq!(placed.width, 13.0);
        assert_eq!(placed.children[1].x, 8.0);
    }

    #[test]
    fn thickness_callback_sees_outer_edges() {
        let table = Table::builder(1, 2)
            .border_thickness(|slot| if slot.outer { 4.0 } else { 1.0 })
            .cells(vec![block(10.0, 10.0), block(10.0, 10.0)])
            .build()
            .unwrap();
        let placed = fill(&table, Constraint::unbounded());
        let g = geometry(&placed);
        // reserve: max(4,1) = 4 per column, outer halves 2 + 2.
        assert_eq!(g.column_lines, vec![2.0, 16.0, 30.0]);
        assert_eq!(placed.width, 32.0);
    }

    #[test]
    fn column_width_is_monotonic_in_cell_size() {
        let base = fill(
            &two_by_two([(10.0, 5.0), (20.0, 5.0), (4.0, 8.0), (4.0, 1.0)]),
            Constraint::unbounded(),
        );
        for grow in 0..4 {
            let mut sizes = [(10.0, 5.0), (20.0, 5.0), (4.0, 8.0), (4.0, 1.0)];
            sizes[grow].0 += 7.0;
            sizes[grow].1 += 3.0;
            let grown = fill(&two_by_two(sizes), Constraint::unbounded());
            let (a, b) = (geometry(&base), geometry(&grown));
            for i in 0..2 {
                assert!(
                    b.column_lines[i + 1] - b.column_lines[i]
                        >= a.column_lines[i + 1] - a.column_lines[i] - 1e-9
                );
                assert!(b.row_lines[i + 1] - b.row_lines[i] >= a.row_lines[i + 1] - a.row_lines[i] - 1e-9);
            }
        }
    }

    #[test]
    fn overflow_shrinks_content_not_borders() {
        let table = two_by_two([(40.0, 5.0), (20.0, 5.0), (40.0, 5.0), (20.0, 5.0)]);
        // natural width 2*2 + 60 + 2 = 66
        let placed = fill(&table, Constraint::bounded(36.0, 100.0));
        let g = geometry(&placed);
        assert!((placed.width - 36.0).abs() < 1e-9);
        // 30pt of content remain, split 2:1
        assert!((g.column_lines[1] - g.column_lines[0] - 22.0).abs() < 1e-9);
        assert!(placed.children[0].node.width <= 20.0 + 1e-9);
    }

    #[test]
    fn borders_thin_out_when_narrower_than_the_lines() {
        let table = two_by_two([(10.0, 5.0), (20.0, 5.0), (4.0, 8.0), (4.0, 1.0)]);
        // the lines alone need 1 + 2 + 2 + 1 = 6pt across
        let engine = LayoutEngine::new();
        let placed = engine
            .fill(&table, &Style::default(), &Constraint::bounded(3.0, 100.0))
            .unwrap();
        let g = geometry(&placed);
        assert!((placed.width - 3.0).abs() < 1e-9);
        assert_eq!(g.column_borders, vec![1.0, 1.0, 1.0]);
        assert_eq!(g.row_borders, vec![2.0, 2.0, 2.0]);
        assert!(placed.children.iter().all(|c| c.node.width == 0.0));

        let mut canvas = RecordingCanvas::new();
        engine.draw(&table, &placed, &mut canvas, 0.0, 0.0).unwrap();
        let limit = Rect::new(0.0, 0.0, 3.0, 100.0);
        let bounds = canvas.bounds().expect("edges drawn");
        assert!(limit.contains(&bounds, 1e-9), "{bounds:?} escapes {limit:?}");
    }

    #[test]
    fn non_shrinkable_overflow_is_an_error() {
        let table = two_by_two([(40.0, 5.0), (20.0, 5.0), (40.0, 5.0), (20.0, 5.0)])
            .with_constraint(ConstraintOverride::default().non_shrinkable());
        let err = LayoutEngine::new()
            .fill(&table, &Style::default(), &Constraint::bounded(36.0, 100.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::OverflowUnsplittable { .. }));
    }

    #[test]
    fn default_edges_are_full_bands() {
        let table = Table::builder(1, 1)
            .uniform_border(2.0)
            .cells(vec![block(10.0, 10.0)])
            .build()
            .unwrap();
        let engine = LayoutEngine::new();
        let placed = engine
            .fill(&table, &Style::default(), &Constraint::unbounded())
            .unwrap();
        let mut canvas = RecordingCanvas::new();
        engine.draw(&table, &placed, &mut canvas, 0.0, 0.0).unwrap();
        let rects: Vec<Rect> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 4);
        // left band covers both corners
        assert_eq!(rects[0], Rect { left: 0.0, top: 0.0, right: 2.0, bottom: 14.0 });
        assert_eq!(
            canvas.bounds(),
            Some(Rect::new(0.0, 0.0, placed.width, placed.height))
        );
    }

    #[test]
    fn open_edge_draws_two_marks() {
        let mut edges = EdgeMap::new(1, 2);
        edges.set_vertical(0, 1, EdgeStyle::Open);
        let table = Table::builder(1, 2)
            .uniform_border(2.0)
            .cells(vec![block(10.0, 10.0), block(10.0, 10.0)])
            .edges(edges)
            .build()
            .unwrap();
        let engine = LayoutEngine::new();
        let placed = engine
            .fill(&table, &Style::default(), &Constraint::unbounded())
            .unwrap();
        let mut canvas = RecordingCanvas::new();
        engine.draw(&table, &placed, &mut canvas, 0.0, 0.0).unwrap();

        assert_eq!(canvas.ops.len(), 1);
        let DrawOp::Path { segments, paint } = &canvas.ops[0] else {
            panic!("expected a path, got {:?}", canvas.ops[0]);
        };
        assert_eq!(paint.stroke, Some(2.0));
        // edge spans y 0..14; marks are 2.8 long, inset by 1.
        let expected = [(13.0, 1.0), (13.0, 3.8), (13.0, 10.2), (13.0, 13.0)];
        let points: Vec<(f64, f64)> = segments
            .iter()
            .filter_map(|s| match *s {
                PathSegment::MoveTo(x, y) | PathSegment::LineTo(x, y) => Some((x, y)),
                PathSegment::Close => None,
            })
            .collect();
        assert_eq!(points.len(), 4);
        for (got, want) in points.iter().zip(expected) {
            assert!((got.0 - want.0).abs() < 1e-9 && (got.1 - want.1).abs() < 1e-9, "{got:?}");
        }
        assert!(matches!(segments[0], PathSegment::MoveTo(..)));
        assert!(matches!(segments[2], PathSegment::MoveTo(..)));
    }

    #[test]
    fn edge_map_ignores_out_of_range() {
        let mut edges = EdgeMap::new(1, 1);
        edges.set_vertical(5, 5, EdgeStyle::Full);
        assert_eq!(edges.vertical(5, 5), EdgeStyle::None);
        edges.set_horizontal(1, 0, EdgeStyle::Open);
        assert_eq!(edges.horizontal(1, 0), EdgeStyle::Open);
    }

    #[test]
    fn centered_table_moves_its_lines() {
        let table = Table::builder(1, 1)
            .uniform_border(2.0)
            .cells(vec![block(10.0, 10.0)])
            .build()
            .unwrap();
        let wrapper = ContentNode::vertical(vec![table]).with_constraint(
            ConstraintOverride::default().halign(crate::layout::HAlign::Center),
        );
        let placed = fill(&wrapper, Constraint::bounded(100.0, 100.0));
        let child = &placed.children[0];
        // The table fills the width and centres its grid inside it.
        assert_eq!(child.node.width, 100.0);
        assert_eq!(geometry(&child.node).column_lines[0], 44.0);
        assert_eq!(child.node.children[0].x, 45.0);
    }
}
