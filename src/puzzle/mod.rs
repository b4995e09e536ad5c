//! # Puzzle Grid
//!
//! The data a word-puzzle renderer reads: a rectangle of [`Cell`]s, each
//! knowing its letter, whether it belongs to the solvable puzzle, and which
//! across and down word placements run through it.
//!
//! Word identity is per placement. Two placements of the same text are two
//! different [`WordId`]s, and the border rules in [`border`] compare ids,
//! never text.

pub mod border;
pub mod file;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

/// Identity of one word placement: its index in the placement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// (row, col) step from one letter to the next.
    fn step(self) -> (usize, usize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Across => "Across",
            Direction::Down => "Down",
        }
    }
}

/// A word written into the grid starting at (`row`, `col`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPlacement {
    pub text: String,
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    #[serde(default)]
    pub clue: Option<String>,
}

impl WordPlacement {
    pub fn new(text: &str, row: usize, col: usize, direction: Direction) -> Self {
        Self {
            text: text.to_string(),
            row,
            col,
            direction,
            clue: None,
        }
    }

    pub fn with_clue(mut self, clue: &str) -> Self {
        self.clue = Some(clue.to_string());
        self
    }

    /// Letters in grid order, uppercased, skipping spaces and hyphens.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .flat_map(char::to_uppercase)
    }

    pub fn len(&self) -> usize {
        self.letters().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(row, col, letter)` for every letter.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        let (dr, dc) = self.direction.step();
        self.letters()
            .enumerate()
            .map(move |(i, ch)| (self.row.saturating_add(i * dr), self.col.saturating_add(i * dc), ch))
    }
}

/// A decorative letter outside the puzzle proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filler {
    pub row: usize,
    pub col: usize,
    pub letter: char,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub letter: Option<char>,
    /// Part of the solvable puzzle rather than filler.
    pub puzzle: bool,
    pub across: Option<WordId>,
    pub down: Option<WordId>,
}

impl Cell {
    pub fn has_letter(&self) -> bool {
        self.letter.is_some()
    }

    /// The word through this cell in `direction`.
    pub fn word(&self, direction: Direction) -> Option<WordId> {
        match direction {
            Direction::Across => self.across,
            Direction::Down => self.down,
        }
    }
}

/// Read access to a rectangular grid of cells.
pub trait GridView {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// `None` outside the grid.
    fn cell(&self, row: usize, col: usize) -> Option<&Cell>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    placements: Vec<WordPlacement>,
}

/// Largest grid accepted, in cells. Far more than fits on any page.
pub const MAX_CELLS: usize = 1 << 20;

impl Grid {
    /// An empty grid.
    pub fn new(width: usize, height: usize) -> Result<Self, PuzzleError> {
        let size = width
            .checked_mul(height)
            .filter(|&cells| cells <= MAX_CELLS)
            .ok_or(PuzzleError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); size],
            placements: Vec::new(),
        })
    }

    /// Write `placements` (puzzle letters) and then `filler` into a fresh
    /// grid. Crossing words must agree on their shared letters.
    pub fn from_placements(
        width: usize,
        height: usize,
        placements: &[WordPlacement],
        filler: &[Filler],
    ) -> Result<Self, PuzzleError> {
        let mut grid = Self::new(width, height)?;

        for (index, placement) in placements.iter().enumerate() {
            if placement.is_empty() {
                return Err(PuzzleError::EmptyWord { index });
            }
            let id = WordId(index as u32);
            for (row, col, letter) in placement.cells() {
                let cell = grid.cell_mut(row, col).ok_or_else(|| PuzzleError::OutOfBounds {
                    word: placement.text.clone(),
                    row: placement.row,
                    col: placement.col,
                    width,
                    height,
                })?;
                if let Some(existing) = cell.letter.filter(|l| *l != letter) {
                    return Err(PuzzleError::LetterConflict {
                        row,
                        col,
                        existing,
                        wanted: letter,
                        word: placement.text.clone(),
                    });
                }
                let slot = match placement.direction {
                    Direction::Across => &mut cell.across,
                    Direction::Down => &mut cell.down,
                };
                if let Some(WordId(other)) = *slot {
                    return Err(PuzzleError::Overlap {
                        row,
                        col,
                        first: placements[other as usize].text.clone(),
                        second: placement.text.clone(),
                    });
                }
                *slot = Some(id);
                cell.letter = Some(letter);
                cell.puzzle = true;
            }
        }

        for f in filler {
            let letter = f.letter.to_uppercase().next().unwrap_or(f.letter);
            let cell = grid.cell_mut(f.row, f.col).ok_or_else(|| PuzzleError::OutOfBounds {
                word: f.letter.to_string(),
                row: f.row,
                col: f.col,
                width,
                height,
            })?;
            match cell.letter {
                Some(existing) if existing != letter => {
                    return Err(PuzzleError::LetterConflict {
                        row: f.row,
                        col: f.col,
                        existing,
                        wanted: letter,
                        word: letter.to_string(),
                    })
                }
                Some(_) => {}
                None => cell.letter = Some(letter),
            }
        }

        grid.placements = placements.to_vec();
        Ok(grid)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        if row < self.height && col < self.width {
            self.cells.get_mut(row * self.width + col)
        } else {
            None
        }
    }

    pub fn placements(&self) -> &[WordPlacement] {
        &self.placements
    }

    pub fn placement(&self, id: WordId) -> Option<&WordPlacement> {
        self.placements.get(id.0 as usize)
    }

    /// Clue numbers: 1, 2, ... for each distinct word start cell in
    /// row-major order.
    pub fn numbering(&self) -> Numbering {
        let starts: BTreeSet<(usize, usize)> =
            self.placements.iter().map(|p| (p.row, p.col)).collect();
        let by_cell: BTreeMap<(usize, usize), u32> = starts.into_iter().zip(1..).collect();
        let by_word = self
            .placements
            .iter()
            .map(|p| by_cell.get(&(p.row, p.col)).copied().unwrap_or(0))
            .collect();
        Numbering { by_cell, by_word }
    }
}

impl GridView for Grid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }
}

/// Clue numbers for a grid's word start cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Numbering {
    by_cell: BTreeMap<(usize, usize), u32>,
    by_word: Vec<u32>,
}

impl Numbering {
    /// Number printed in cell (`row`, `col`), if a word starts there.
    pub fn at(&self, row: usize, col: usize) -> Option<u32> {
        self.by_cell.get(&(row, col)).copied()
    }

    pub fn of(&self, id: WordId) -> Option<u32> {
        self.by_word.get(id.0 as usize).copied()
    }

    /// `(number, placement)` for every word in `direction`, by number.
    pub fn clues<'g>(&self, grid: &'g Grid, direction: Direction) -> Vec<(u32, &'g WordPlacement)> {
        let mut clues: Vec<_> = grid
            .placements()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.direction == direction)
            .filter_map(|(i, p)| self.of(WordId(i as u32)).map(|n| (n, p)))
            .collect();
        clues.sort_by_key(|(n, _)| *n);
        clues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        // C A T
        // . . O
        // . . E
        Grid::from_placements(
            3,
            3,
            &[
                WordPlacement::new("cat", 0, 0, Direction::Across),
                WordPlacement::new("toe", 0, 2, Direction::Down),
            ],
            &[Filler {
                row: 2,
                col: 0,
                letter: 'x',
            }],
        )
        .expect("valid grid")
    }

    #[test]
    fn placements_fill_cells() {
        let grid = sample();
        let corner = grid.cell(0, 2).unwrap();
        assert_eq!(corner.letter, Some('T'));
        assert_eq!(corner.across, Some(WordId(0)));
        assert_eq!(corner.down, Some(WordId(1)));
        assert!(corner.puzzle);

        let filler = grid.cell(2, 0).unwrap();
        assert_eq!(filler.letter, Some('X'));
        assert!(!filler.puzzle);
        assert_eq!(filler.across, None);

        assert!(!grid.cell(1, 1).unwrap().has_letter());
        assert!(grid.cell(3, 0).is_none());
    }

    #[test]
    fn crossing_letters_must_agree() {
        let err = Grid::from_placements(
            3,
            3,
            &[
                WordPlacement::new("cat", 0, 0, Direction::Across),
                WordPlacement::new("dog", 0, 2, Direction::Down),
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PuzzleError::LetterConflict {
                existing: 'T',
                wanted: 'D',
                ..
            }
        ));
    }

    #[test]
    fn words_must_stay_inside() {
        let err = Grid::from_placements(
            2,
            2,
            &[WordPlacement::new("long", 0, 0, Direction::Across)],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, PuzzleError::OutOfBounds { .. }));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let err = Grid::from_placements(usize::MAX, 2, &[], &[]).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::TooLarge {
                width: usize::MAX,
                height: 2
            }
        );
        assert!(matches!(
            Grid::new(2048, 1024),
            Err(PuzzleError::TooLarge { .. })
        ));
        assert!(Grid::new(1024, 1024).is_ok());
    }

    #[test]
    fn word_starting_at_the_far_edge_of_usize_is_out_of_bounds() {
        let err = Grid::from_placements(
            3,
            3,
            &[WordPlacement::new("cat", usize::MAX, 0, Direction::Down)],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, PuzzleError::OutOfBounds { .. }));
    }

    #[test]
    fn same_direction_overlap_is_rejected() {
        let err = Grid::from_placements(
            4,
            1,
            &[
                WordPlacement::new("ab", 0, 0, Direction::Across),
                WordPlacement::new("bc", 0, 1, Direction::Across),
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, PuzzleError::Overlap { row: 0, col: 1, .. }));
    }

    #[test]
    fn empty_word_is_rejected() {
        let err = Grid::from_placements(2, 2, &[WordPlacement::new(" ", 0, 0, Direction::Down)], &[])
            .unwrap_err();
        assert_eq!(err, PuzzleError::EmptyWord { index: 0 });
    }

    #[test]
    fn identical_text_gets_distinct_ids() {
        let grid = Grid::from_placements(
            3,
            2,
            &[
                WordPlacement::new("ab", 0, 0, Direction::Across),
                WordPlacement::new("ab", 1, 0, Direction::Across),
            ],
            &[],
        )
        .unwrap();
        assert_ne!(grid.cell(0, 0).unwrap().across, grid.cell(1, 0).unwrap().across);
    }

    #[test]
    fn numbering_is_row_major_over_start_cells() {
        let grid = sample();
        let numbers = grid.numbering();
        assert_eq!(numbers.at(0, 0), Some(1));
        assert_eq!(numbers.at(0, 2), Some(2));
        assert_eq!(numbers.at(1, 1), None);

        let down = numbers.clues(&grid, Direction::Down);
        assert_eq!(down.len(), 1);
        assert_eq!(down[0].0, 2);
        assert_eq!(down[0].1.text, "toe");
    }

    #[test]
    fn shared_start_cell_shares_a_number() {
        let grid = Grid::from_placements(
            2,
            2,
            &[
                WordPlacement::new("ab", 0, 0, Direction::Across),
                WordPlacement::new("ac", 0, 0, Direction::Down),
            ],
            &[],
        )
        .unwrap();
        let numbers = grid.numbering();
        assert_eq!(numbers.of(WordId(0)), Some(1));
        assert_eq!(numbers.of(WordId(1)), Some(1));
    }

    #[test]
    fn multi_word_answers_skip_spaces() {
        let p = WordPlacement::new("ice cream", 0, 0, Direction::Across);
        assert_eq!(p.len(), 8);
        assert_eq!(p.cells().last(), Some((0, 7, 'M')));
    }
}
