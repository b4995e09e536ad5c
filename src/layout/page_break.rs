//! # Page Break Decisions
//!
//! What to do with the next child of a flow, given how tall it is and how
//! much of the area is left. Kept free of any node types so the rules can
//! be read (and tested) on their own.

use super::constraint::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// The child fits in what is left.
    Place,
    /// The child does not fit but can break between its own children:
    /// place what fits here and continue in the next area.
    Split,
    /// The child cannot break and does not fit: leave it for the next area.
    MoveToNextArea,
    /// The child cannot break and is taller than an entire empty area.
    /// Moving it would never help; report it and skip (or clamp) it.
    Oversized,
}

/// Decide for a child of natural height `height` when `remaining` points of
/// the area are free. `area_top` is true when nothing has been placed in
/// the area yet.
pub fn decide_break(height: f64, remaining: f64, splittable: bool, area_top: bool) -> BreakDecision {
    if height <= remaining + EPSILON {
        BreakDecision::Place
    } else if splittable {
        BreakDecision::Split
    } else if area_top {
        BreakDecision::Oversized
    } else {
        BreakDecision::MoveToNextArea
    }
}
