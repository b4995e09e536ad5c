//! Border synthesis: the [`EdgeStyle`] of every edge of a word grid.
//!
//! Walls go where a word ends. Between two letters of the same word the edge
//! is [`EdgeStyle::Open`], which marks the cell boundary without closing it.
//! Everything here is a pure function of the two cells beside an edge.

use super::{Cell, Direction, GridView};
use crate::layout::{EdgeMap, EdgeStyle};

/// Style of one edge.
///
/// A vertical edge `(row, col)` is the left side of cell `(row, col)` and
/// has `col` in `0..=width`; a horizontal edge `(row, col)` is the top of
/// cell `(row, col)` and has `row` in `0..=height`. Edges off the grid are
/// `None`.
pub fn edge_style<G: GridView + ?Sized>(grid: &G, row: usize, col: usize, vertical: bool) -> EdgeStyle {
    let (before, after) = if vertical {
        if row >= grid.height() {
            return EdgeStyle::None;
        }
        (col.checked_sub(1).and_then(|c| grid.cell(row, c)), grid.cell(row, col))
    } else {
        if col >= grid.width() {
            return EdgeStyle::None;
        }
        (row.checked_sub(1).and_then(|r| grid.cell(r, col)), grid.cell(row, col))
    };

    match (before, after) {
        (None, None) => EdgeStyle::None,
        (Some(cell), None) | (None, Some(cell)) => {
            if cell.has_letter() {
                EdgeStyle::Full
            } else {
                EdgeStyle::None
            }
        }
        (Some(a), Some(b)) => {
            let axis = if vertical {
                Direction::Across
            } else {
                Direction::Down
            };
            internal_edge(a, b, axis)
        }
    }
}

fn internal_edge(a: &Cell, b: &Cell, axis: Direction) -> EdgeStyle {
    match (a.has_letter(), b.has_letter()) {
        (false, false) => EdgeStyle::None,
        (true, false) => wall_if(a.puzzle),
        (false, true) => wall_if(b.puzzle),
        (true, true) => match (a.word(axis), b.word(axis)) {
            (Some(x), Some(y)) if x == y => {
                if a.puzzle || b.puzzle {
                    EdgeStyle::Open
                } else {
                    EdgeStyle::None
                }
            }
            _ => EdgeStyle::Full,
        },
    }
}

fn wall_if(puzzle: bool) -> EdgeStyle {
    if puzzle {
        EdgeStyle::Full
    } else {
        EdgeStyle::None
    }
}

/// Edge styles for the whole grid, shaped for a `height x width` table.
pub fn synthesize_edges<G: GridView + ?Sized>(grid: &G) -> EdgeMap {
    let (width, height) = (grid.width(), grid.height());
    let mut edges = EdgeMap::new(height, width);
    for row in 0..height {
        for col in 0..=width {
            edges.set_vertical(row, col, edge_style(grid, row, col, true));
        }
    }
    for row in 0..=height {
        for col in 0..width {
            edges.set_horizontal(row, col, edge_style(grid, row, col, false));
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Filler, Grid, WordId, WordPlacement};

    /// A hand-built grid, for cases placements cannot express.
    struct Cells {
        width: usize,
        cells: Vec<Cell>,
    }

    impl GridView for Cells {
        fn width(&self) -> usize {
            self.width
        }

        fn height(&self) -> usize {
            self.cells.len() / self.width
        }

        fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
            (col < self.width)
                .then(|| self.cells.get(row * self.width + col))
                .flatten()
        }
    }

    fn letter(puzzle: bool, across: Option<u32>, down: Option<u32>) -> Cell {
        Cell {
            letter: Some('A'),
            puzzle,
            across: across.map(WordId),
            down: down.map(WordId),
        }
    }

    #[test]
    fn one_by_three_same_word() {
        let row = Cells {
            width: 3,
            cells: vec![
                letter(false, Some(7), None),
                letter(true, Some(7), None),
                letter(false, Some(7), None),
            ],
        };
        assert_eq!(edge_style(&row, 0, 1, true), EdgeStyle::Open);
        assert_eq!(edge_style(&row, 0, 2, true), EdgeStyle::Open);
        assert_eq!(edge_style(&row, 0, 0, true), EdgeStyle::Full);
        assert_eq!(edge_style(&row, 0, 3, true), EdgeStyle::Full);
    }

    #[test]
    fn missing_word_on_one_side_is_full() {
        let pair = Cells {
            width: 2,
            cells: vec![letter(true, Some(1), None), letter(true, None, Some(2))],
        };
        assert_eq!(edge_style(&pair, 0, 1, true), EdgeStyle::Full);
    }

    #[test]
    fn different_words_are_walled() {
        let pair = Cells {
            width: 2,
            cells: vec![letter(true, Some(1), None), letter(true, Some(2), None)],
        };
        assert_eq!(edge_style(&pair, 0, 1, true), EdgeStyle::Full);
    }

    #[test]
    fn same_word_outside_the_puzzle_is_unmarked() {
        let pair = Cells {
            width: 2,
            cells: vec![letter(false, Some(1), None), letter(false, Some(1), None)],
        };
        assert_eq!(edge_style(&pair, 0, 1, true), EdgeStyle::None);
    }

    #[test]
    fn letter_beside_blank() {
        let puzzle = Cells {
            width: 2,
            cells: vec![letter(true, None, None), Cell::default()],
        };
        assert_eq!(edge_style(&puzzle, 0, 1, true), EdgeStyle::Full);

        let filler = Cells {
            width: 2,
            cells: vec![letter(false, None, None), Cell::default()],
        };
        assert_eq!(edge_style(&filler, 0, 1, true), EdgeStyle::None);
        // boundary beside the blank cell
        assert_eq!(edge_style(&filler, 0, 2, true), EdgeStyle::None);
    }

    #[test]
    fn horizontal_edges_compare_down_words() {
        let column = Cells {
            width: 1,
            cells: vec![letter(true, Some(1), Some(5)), letter(true, Some(1), Some(5))],
        };
        assert_eq!(edge_style(&column, 1, 0, false), EdgeStyle::Open);
        assert_eq!(edge_style(&column, 0, 0, false), EdgeStyle::Full);
        assert_eq!(edge_style(&column, 2, 0, false), EdgeStyle::Full);
        // The shared across word does not open a vertical boundary edge.
        assert_eq!(edge_style(&column, 0, 1, true), EdgeStyle::Full);
    }

    #[test]
    fn off_grid_edges_are_none() {
        let row = Cells {
            width: 1,
            cells: vec![letter(true, None, None)],
        };
        assert_eq!(edge_style(&row, 5, 0, true), EdgeStyle::None);
        assert_eq!(edge_style(&row, 0, 5, false), EdgeStyle::None);
        assert_eq!(edge_style(&row, 0, 3, true), EdgeStyle::None);
    }

    #[test]
    fn edge_depends_only_on_its_two_cells() {
        let mut cells = vec![
            letter(true, Some(1), None),
            letter(true, Some(1), None),
            letter(true, Some(2), None),
        ];
        let before = edge_style(&Cells { width: 3, cells: cells.clone() }, 0, 1, true);
        cells[2] = Cell::default();
        let after = edge_style(&Cells { width: 3, cells }, 0, 1, true);
        assert_eq!(before, after);
    }

    #[test]
    fn grid_from_placements() {
        // C A T
        // . . O
        let grid = Grid::from_placements(
            3,
            2,
            &[
                WordPlacement::new("cat", 0, 0, Direction::Across),
                WordPlacement::new("to", 0, 2, Direction::Down),
            ],
            &[Filler {
                row: 1,
                col: 0,
                letter: 'q',
            }],
        )
        .unwrap();
        let edges = synthesize_edges(&grid);
        assert_eq!(edges.vertical(0, 1), EdgeStyle::Open);
        assert_eq!(edges.vertical(0, 2), EdgeStyle::Open);
        assert_eq!(edges.vertical(1, 2), EdgeStyle::Full);
        assert_eq!(edges.horizontal(1, 2), EdgeStyle::Open);
        assert_eq!(edges.horizontal(1, 1), EdgeStyle::None);
        // filler under a puzzle letter: both have letters, no down word on top
        assert_eq!(edges.horizontal(1, 0), EdgeStyle::Full);
        // filler beside a blank
        assert_eq!(edges.vertical(1, 1), EdgeStyle::None);
        assert_eq!(edges.horizontal(2, 0), EdgeStyle::Full);
        assert_eq!(edges.horizontal(2, 1), EdgeStyle::None);
    }

    #[test]
    fn synthesis_is_repeatable() {
        let grid = Grid::from_placements(
            2,
            2,
            &[WordPlacement::new("ab", 0, 0, Direction::Across)],
            &[],
        )
        .unwrap();
        assert_eq!(synthesize_edges(&grid), synthesize_edges(&grid));
    }
}
