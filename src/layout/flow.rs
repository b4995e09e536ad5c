//! # Resumable Flow
//!
//! Filling a splittable composite into a bounded area, stopping at the first
//! child that does not fit, and reporting where to pick up again.
//!
//! The position is an explicit [`StreamCursor`] owned by the caller. The
//! content tree is never mutated, so filling the same node from the same
//! cursor always produces the same fragment, and consecutive fragments cover
//! the children exactly once and in order.
//!
//! A cursor is a path: `index` is the next child of this composite to
//! place, and `inner`, when present, is the position *inside* that child,
//! which was split by the previous area and is still draining.

use super::constraint::{Constraint, EPSILON, UNBOUNDED};
use super::page_break::{decide_break, BreakDecision};
use super::{column_constraint, finish, merge_columns, LayoutEngine, Packed, PlacedChild, PlacedKind, PlacedNode};
use crate::error::LayoutError;
use crate::model::{Arrangement, ContentNode};
use crate::style::Style;

/// Position within a splittable composite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamCursor {
    pub index: usize,
    pub inner: Option<Box<StreamCursor>>,
}

impl StreamCursor {
    pub fn start() -> Self {
        Self::default()
    }

    pub fn at(index: usize) -> Self {
        Self { index, inner: None }
    }

    /// The child at `index` is only partly placed.
    pub fn is_draining(&self) -> bool {
        self.inner.is_some()
    }

    /// Cursor to the child after the current one, dropping any partial
    /// progress inside it.
    pub fn skip_current(&self) -> Self {
        Self::at(self.index + 1)
    }

    fn within(index: usize, inner: StreamCursor) -> Self {
        Self {
            index,
            inner: Some(Box::new(inner)),
        }
    }
}

/// What one area received from a stream.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub placed: PlacedNode,
    /// Where the next area continues; `None` once the stream is exhausted.
    pub next: Option<StreamCursor>,
    /// Oversized content skipped or clamped while filling this area.
    pub warnings: Vec<LayoutError>,
}

impl Fragment {
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowOptions {
    /// Place oversized unsplittable children clamped instead of skipping them.
    pub clamp_oversized: bool,
}

impl LayoutEngine {
    /// Fill `node` into a bounded area starting from `cursor`.
    ///
    /// Splittable composites stop at the first child that does not fit. Any
    /// other node (or a splittable one under an unbounded height) is placed
    /// whole, which is only valid from the start cursor.
    pub fn fill_from(
        &self,
        node: &ContentNode,
        inherited_style: &Style,
        inherited: &Constraint,
        cursor: &StreamCursor,
        options: FlowOptions,
    ) -> Result<Fragment, LayoutError> {
        self.fill_fragment(node, inherited_style, inherited, cursor, options, true)
    }

    fn fill_fragment(
        &self,
        node: &ContentNode,
        inherited_style: &Style,
        inherited: &Constraint,
        cursor: &StreamCursor,
        options: FlowOptions,
        area_top: bool,
    ) -> Result<Fragment, LayoutError> {
        let composite = match node {
            ContentNode::Composite(c) if c.is_splittable() && inherited.height_bounded() => c,
            _ => {
                if *cursor != StreamCursor::start() {
                    return Err(LayoutError::mismatch(format!(
                        "cursor {cursor:?} points into content that cannot split"
                    )));
                }
                let placed = self.fill(node, inherited_style, inherited)?;
                return Ok(Fragment {
                    placed,
                    next: None,
                    warnings: Vec::new(),
                });
            }
        };

        let style = composite.style.resolve(inherited_style);
        let constraint = composite.constraint.resolve(inherited);
        let inner = constraint.with_max(
            constraint.max_width - composite.padding.horizontal(),
            constraint.max_height - composite.padding.vertical(),
        );
        let children = composite.children();
        let mut flow = Flow {
            engine: self,
            children,
            style: &style,
            options,
            warnings: Vec::new(),
        };

        let (packed, next) = match composite.arrangement() {
            Arrangement::Vertical { gap } => flow.vertical(&inner, *gap, cursor, area_top)?,
            Arrangement::MultiColumn { columns, gap } => {
                flow.columns(&inner, (*columns).max(1), *gap, cursor, area_top)?
            }
            other => {
                return Err(LayoutError::mismatch(format!(
                    "{} arrangement cannot be resumed",
                    other.name()
                )))
            }
        };

        let warnings = flow.warnings;
        Ok(Fragment {
            placed: finish(composite, style, &constraint, packed),
            next,
            warnings,
        })
    }
}

/// Shared state while filling one composite's children into one area.
struct Flow<'a> {
    engine: &'a LayoutEngine,
    children: &'a [ContentNode],
    style: &'a Style,
    options: FlowOptions,
    warnings: Vec<LayoutError>,
}

impl Flow<'_> {
    fn vertical(
        &mut self,
        inner: &Constraint,
        gap: f64,
        cursor: &StreamCursor,
        area_top: bool,
    ) -> Result<(Packed, Option<StreamCursor>), LayoutError> {
        if cursor.index > self.children.len()
            || (cursor.is_draining() && cursor.index == self.children.len())
        {
            return Err(LayoutError::mismatch(format!(
                "cursor at child {} of {}",
                cursor.index,
                self.children.len()
            )));
        }

        let mut packed = Packed::empty(PlacedKind::Vertical);
        let mut y = 0.0_f64;
        let mut index = cursor.index;
        let mut resume = cursor.inner.as_deref().cloned();

        while index < self.children.len() {
            let child = &self.children[index];
            let top = if packed.children.is_empty() {
                0.0
            } else {
                (y + gap).min(inner.max_height)
            };
            let remaining = inner.max_height - top;
            let at_top = area_top && packed.children.is_empty();
            let bounded = inner.with_max_height(remaining);

            // Draining: finish a child that was split (or must be) first.
            let from = match resume.take() {
                Some(inner_cursor) => inner_cursor,
                None => {
                    let natural = match self.engine.fill(child, self.style, &inner.with_max_height(UNBOUNDED)) {
                        Ok(natural) => natural,
                        // A splittable child gets another chance child by child.
                        Err(_) if child.is_splittable() => {
                            resume = Some(StreamCursor::start());
                            continue;
                        }
                        Err(e) => {
                            tracing::warn!(child = index, error = %e, "skipping content that failed to lay out");
                            self.warnings.push(e);
                            index += 1;
                            continue;
                        }
                    };
                    let wide = self.too_wide(child, inner);
                    let decision = match decide_break(natural.height, remaining, child.is_splittable(), at_top) {
                        // Fits by height, but some leaf inside cannot narrow to the area.
                        BreakDecision::Place if wide.is_some() => {
                            if child.is_splittable() {
                                BreakDecision::Split
                            } else {
                                BreakDecision::Oversized
                            }
                        }
                        other => other,
                    };
                    match decision {
                        BreakDecision::Place => {
                            y = top + natural.height;
                            packed.push_row(PlacedChild {
                                index,
                                x: 0.0,
                                y: top,
                                node: natural,
                            });
                            index += 1;
                            continue;
                        }
                        BreakDecision::Split => StreamCursor::start(),
                        BreakDecision::MoveToNextArea => break,
                        BreakDecision::Oversized => {
                            let warning = LayoutError::OverflowUnsplittable {
                                width: wide.unwrap_or(natural.width),
                                height: natural.height,
                                max_width: inner.max_width,
                                max_height: remaining,
                            };
                            if self.options.clamp_oversized {
                                tracing::warn!(child = index, %warning, "clamping oversized content");
                                let clamped = self.engine.fill(child, self.style, &bounded)?;
                                y = top + clamped.height;
                                packed.push_row(PlacedChild {
                                    index,
                                    x: 0.0,
                                    y: top,
                                    node: clamped,
                                });
                            } else {
                                tracing::warn!(child = index, %warning, "skipping oversized content");
                            }
                            self.warnings.push(warning);
                            index += 1;
                            continue;
                        }
                    }
                }
            };

            let fragment = self
                .engine
                .fill_fragment(child, self.style, &bounded, &from, self.options, at_top)?;
            if fragment.next.as_ref() == Some(&from) {
                // Nothing more of this child fit; try again in the next area.
                packed.height = y;
                let next = if from == StreamCursor::start() {
                    StreamCursor::at(index)
                } else {
                    StreamCursor::within(index, from)
                };
                return Ok((packed, Some(next)));
            }
            self.warnings.extend(fragment.warnings);
            y = top + fragment.placed.height;
            packed.push_row(PlacedChild {
                index,
                x: 0.0,
                y: top,
                node: fragment.placed,
            });
            match fragment.next {
                Some(rest) => {
                    packed.height = y;
                    return Ok((packed, Some(StreamCursor::within(index, rest))));
                }
                None => index += 1,
            }
        }

        packed.height = y;
        let next = (index < self.children.len()).then(|| StreamCursor::at(index));
        Ok((packed, next))
    }

    /// Width `child` needs at the least, when that is more than the area has.
    fn too_wide(&self, child: &ContentNode, inner: &Constraint) -> Option<f64> {
        if !inner.width_bounded() {
            return None;
        }
        let needed = self.engine.min_content_width(child, self.style);
        (needed > inner.max_width + EPSILON).then_some(needed)
    }

    /// Pour the stream through `count` columns, each a bounded sub-area.
    fn columns(
        &mut self,
        inner: &Constraint,
        count: usize,
        gap: f64,
        cursor: &StreamCursor,
        area_top: bool,
    ) -> Result<(Packed, Option<StreamCursor>), LayoutError> {
        let column = column_constraint(inner, count, gap);
        let mut filled = Vec::with_capacity(count);
        let mut cursor = cursor.clone();
        let mut next = Some(cursor.clone());

        for _ in 0..count {
            let (packed, after) = self.vertical(&column, 0.0, &cursor, area_top)?;
            let progressed = after.as_ref() != Some(&cursor);
            if progressed {
                filled.push(packed);
            }
            next = after;
            match &next {
                Some(c) if progressed => cursor = c.clone(),
                _ => break,
            }
        }

        Ok((merge_columns(filled, inner, count, gap), next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ConstraintOverride;
    use crate::model::Composite;
    use crate::style::Color;

    fn block(h: f64) -> ContentNode {
        ContentNode::block(10.0, h, Some(Color::BLACK))
    }

    fn page(height: f64) -> Constraint {
        Constraint::bounded(100.0, height)
    }

    fn run(node: &ContentNode, area: Constraint, cursor: &StreamCursor) -> Fragment {
        LayoutEngine::new()
            .fill_from(node, &Style::default(), &area, cursor, FlowOptions::default())
            .expect("flow succeeds")
    }

    /// Every fragment's top-level child indices, until exhaustion.
    fn pages(node: &ContentNode, area: Constraint) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        let mut cursor = Some(StreamCursor::start());
        while let Some(c) = cursor {
            let fragment = run(node, area, &c);
            out.push(fragment.placed.child_indices());
            cursor = fragment.next;
            assert!(out.len() < 100, "flow did not terminate");
        }
        out
    }

    #[test]
    fn stops_at_first_child_that_does_not_fit() {
        let stream = ContentNode::vertical(vec![block(10.0), block(10.0), block(10.0)]);
        let first = run(&stream, page(25.0), &StreamCursor::start());
        assert_eq!(first.placed.child_indices(), vec![0, 1]);
        assert_eq!(first.next, Some(StreamCursor::at(2)));

        let second = run(&stream, page(25.0), &StreamCursor::at(2));
        assert_eq!(second.placed.child_indices(), vec![2]);
        assert!(second.is_exhausted());
    }

    #[test]
    fn resuming_is_repeatable() {
        let stream = ContentNode::vertical((0..5).map(|_| block(10.0)).collect());
        let a = run(&stream, page(25.0), &StreamCursor::at(2));
        let b = run(&stream, page(25.0), &StreamCursor::at(2));
        assert_eq!(a.placed, b.placed);
        assert_eq!(a.next, b.next);
    }

    #[test]
    fn nested_split_drains_into_next_area() {
        let inner = ContentNode::vertical(vec![block(10.0), block(10.0), block(10.0)]);
        let stream = ContentNode::vertical(vec![block(10.0), inner, block(10.0)]);

        let first = run(&stream, page(25.0), &StreamCursor::start());
        assert_eq!(first.placed.child_indices(), vec![0, 1]);
        assert_eq!(first.placed.children[1].node.child_indices(), vec![0]);
        let next = first.next.expect("more to come");
        assert!(next.is_draining());
        assert_eq!(next, StreamCursor::within(1, StreamCursor::at(1)));

        let second = run(&stream, page(25.0), &next);
        assert_eq!(second.placed.child_indices(), vec![1]);
        assert_eq!(second.placed.children[0].node.child_indices(), vec![1, 2]);
        assert_eq!(second.next, Some(StreamCursor::at(2)));
    }

    #[test]
    fn split_that_places_nothing_moves_on() {
        let inner = ContentNode::vertical(vec![block(20.0), block(20.0)]);
        let stream = ContentNode::vertical(vec![block(10.0), inner]);
        assert_eq!(pages(&stream, page(25.0)), vec![vec![0], vec![1], vec![1]]);
    }

    #[test]
    fn unsplittable_composite_moves_whole() {
        let pinned = Composite::builder(Arrangement::Vertical { gap: 0.0 })
            .unsplittable()
            .children(vec![block(10.0), block(10.0)])
            .build();
        let stream = ContentNode::vertical(vec![block(10.0), pinned]);
        assert_eq!(pages(&stream, page(25.0)), vec![vec![0], vec![1]]);
    }

    #[test]
    fn oversized_child_at_top_is_skipped_with_warning() {
        let stream = ContentNode::vertical(vec![block(10.0), block(40.0), block(10.0)]);
        let first = run(&stream, page(25.0), &StreamCursor::start());
        assert_eq!(first.placed.child_indices(), vec![0]);
        assert!(first.warnings.is_empty());

        let second = run(&stream, page(25.0), &first.next.clone().unwrap());
        assert_eq!(second.placed.child_indices(), vec![2]);
        assert_eq!(second.warnings.len(), 1);
        assert!(matches!(
            second.warnings[0],
            LayoutError::OverflowUnsplittable { height, .. } if height == 40.0
        ));
    }

    #[test]
    fn oversized_child_can_be_clamped() {
        let stream = ContentNode::vertical(vec![block(40.0)]);
        let fragment = LayoutEngine::new()
            .fill_from(
                &stream,
                &Style::default(),
                &page(25.0),
                &StreamCursor::start(),
                FlowOptions {
                    clamp_oversized: true,
                },
            )
            .unwrap();
        assert_eq!(fragment.placed.children[0].node.height, 25.0);
        assert_eq!(fragment.warnings.len(), 1);
        assert!(fragment.is_exhausted());
    }

    #[test]
    fn child_wider_than_the_area_is_skipped_with_warning() {
        let wide = ContentNode::text("a rather long unbroken line of text");
        let stream = ContentNode::vertical(vec![block(10.0), wide, block(10.0)]);
        let fragment = run(&stream, page(100.0), &StreamCursor::start());
        assert_eq!(fragment.placed.child_indices(), vec![0, 2]);
        assert!(fragment.is_exhausted());
        assert!(matches!(
            fragment.warnings.as_slice(),
            [LayoutError::OverflowUnsplittable { width, max_width, .. }]
                if *width > 100.0 && *max_width == 100.0
        ));
    }

    #[test]
    fn wide_content_inside_a_splittable_child_is_found() {
        let wide = ContentNode::block(150.0, 10.0, Some(Color::BLACK));
        let inner = ContentNode::vertical(vec![block(10.0), wide]);
        let stream = ContentNode::vertical(vec![inner, block(10.0)]);
        let fragment = run(&stream, page(100.0), &StreamCursor::start());
        assert_eq!(fragment.placed.child_indices(), vec![0, 1]);
        assert_eq!(fragment.placed.children[0].node.child_indices(), vec![0]);
        assert_eq!(fragment.warnings.len(), 1);
    }

    #[test]
    fn wrapping_paragraph_is_not_too_wide() {
        let words = ContentNode::paragraph(
            "many short words that wrap onto several lines easily",
            Default::default(),
        );
        let stream = ContentNode::vertical(vec![words]);
        let fragment = run(&stream, page(100.0), &StreamCursor::start());
        assert_eq!(fragment.placed.child_indices(), vec![0]);
        assert!(fragment.warnings.is_empty());
    }

    #[test]
    fn columns_fill_in_sequence() {
        let stream = ContentNode::columns(2, 10.0, (0..5).map(|_| block(10.0)).collect());
        let first = run(&stream, page(25.0), &StreamCursor::start());
        let xs: Vec<f64> = first.placed.children.iter().map(|c| c.x).collect();
        assert_eq!(first.placed.child_indices(), vec![0, 1, 2, 3]);
        assert_eq!(xs, vec![0.0, 0.0, 55.0, 55.0]);
        assert_eq!(first.next, Some(StreamCursor::at(4)));

        let second = run(&stream, page(25.0), &StreamCursor::at(4));
        assert_eq!(second.placed.child_indices(), vec![4]);
        assert!(second.is_exhausted());
    }

    #[test]
    fn nested_columns_inside_vertical() {
        let clues = ContentNode::columns(2, 0.0, (0..6).map(|_| block(10.0)).collect());
        let stream = ContentNode::vertical(vec![block(10.0), clues]);
        let first = run(&stream, page(30.0), &StreamCursor::start());
        let columns = &first.placed.children[1].node;
        assert_eq!(columns.child_indices(), vec![0, 1, 2, 3]);
        assert_eq!(
            first.next,
            Some(StreamCursor::within(1, StreamCursor::at(4)))
        );
    }

    #[test]
    fn padding_shrinks_the_area() {
        let stream = Composite::builder(Arrangement::Vertical { gap: 0.0 })
            .padding(crate::model::Edges::uniform(5.0))
            .children(vec![block(10.0), block(10.0)])
            .build();
        let first = run(&stream, page(25.0), &StreamCursor::start());
        assert_eq!(first.placed.child_indices(), vec![0]);
        assert_eq!(first.placed.children[0].y, 5.0);
    }

    #[test]
    fn cursor_into_a_leaf_is_a_mismatch() {
        let err = LayoutEngine::new()
            .fill_from(
                &block(1.0),
                &Style::default(),
                &page(25.0),
                &StreamCursor::at(1),
                FlowOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, LayoutError::StreamMismatch(_)));
    }

    #[test]
    fn unbounded_height_places_everything() {
        let stream = ContentNode::vertical((0..4).map(|_| block(10.0)).collect())
            .with_constraint(ConstraintOverride::default());
        let fragment = run(&stream, Constraint::unbounded(), &StreamCursor::start());
        assert_eq!(fragment.placed.child_indices(), vec![0, 1, 2, 3]);
        assert!(fragment.is_exhausted());
    }
}
