//! # Line and Column Partitioning
//!
//! Pure functions over measured sizes. The engine measures children first,
//! then asks these helpers where lines wrap, how to shrink an overfull row of
//! columns, and how to split a list of heights into balanced columns.

use std::ops::Range;

use super::constraint::EPSILON;

/// One measured item of a reading flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem {
    pub width: f64,
    /// A forced break: this item ends its line. It takes no gap before it.
    pub line_break: bool,
}

impl LineItem {
    pub fn word(width: f64) -> Self {
        Self {
            width,
            line_break: false,
        }
    }
}

/// A wrapped line: items `start..end` and the width they occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapLine {
    pub start: usize,
    pub end: usize,
    pub width: f64,
}

/// Greedy first-fit wrap. An item that would push the line past
/// `available_width` starts a new line, except that the first item of a
/// line always stays (a line is never empty).
pub fn partition_into_lines(items: &[LineItem], gap: f64, available_width: f64) -> Vec<WrapLine> {
    if items.is_empty() {
        return vec![];
    }

    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_width = 0.0;

    for (i, item) in items.iter().enumerate() {
        let needed = if i == line_start || item.line_break {
            item.width
        } else {
            gap + item.width
        };
        if i > line_start && line_width + needed > available_width + EPSILON {
            lines.push(WrapLine {
                start: line_start,
                end: i,
                width: line_width,
            });
            line_start = i;
            line_width = item.width;
        } else {
            line_width += needed;
        }

        if item.line_break {
            lines.push(WrapLine {
                start: line_start,
                end: i + 1,
                width: line_width,
            });
            line_start = i + 1;
            line_width = 0.0;
        }
    }

    if line_start < items.len() {
        lines.push(WrapLine {
            start: line_start,
            end: items.len(),
            width: line_width,
        });
    }

    lines
}

/// Shrink `sizes` proportionally so that their sum drops by `overflow`.
/// Larger entries give up more. No entry goes below zero.
pub fn shrink_proportionally(sizes: &mut [f64], overflow: f64) {
    let total: f64 = sizes.iter().sum();
    if total <= 0.0 || overflow <= 0.0 {
        return;
    }
    let keep = ((total - overflow) / total).max(0.0);
    for size in sizes.iter_mut() {
        *size = (*size * keep).max(0.0);
    }
}

/// Split `heights` into at most `columns` consecutive groups, minimizing the
/// tallest group.
///
/// Starts from the lower bound (the tallest item, or the even share) and
/// raises the target by the smallest overshoot until a greedy fill needs no
/// more than `columns` groups.
pub fn balance_columns(heights: &[f64], columns: usize) -> Vec<Range<usize>> {
    if heights.is_empty() {
        return vec![];
    }
    let columns = columns.max(1);
    let total: f64 = heights.iter().sum();
    let tallest = heights.iter().copied().fold(0.0, f64::max);
    let mut target = tallest.max(total / columns as f64);

    loop {
        let (groups, overshoot) = greedy_groups(heights, target);
        if groups.len() <= columns || !overshoot.is_finite() {
            return groups;
        }
        target += overshoot;
    }
}

/// Fill groups up to `target`; also report the smallest amount by which a
/// rejected item overshot it.
fn greedy_groups(heights: &[f64], target: f64) -> (Vec<Range<usize>>, f64) {
    let mut groups = Vec::new();
    let mut start = 0;
    let mut sum = 0.0;
    let mut overshoot = f64::INFINITY;

    for (i, &h) in heights.iter().enumerate() {
        if i > start && sum + h > target + EPSILON {
            overshoot = overshoot.min(sum + h - target);
            groups.push(start..i);
            start = i;
            sum = 0.0;
        }
        sum += h;
    }
    groups.push(start..heights.len());
    (groups, overshoot)
}
