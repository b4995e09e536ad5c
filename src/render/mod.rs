//! # Puzzle Rendering
//!
//! Turns a [`Grid`] into a content tree the layout engine can paginate:
//!
//! ```text
//! Vertical (splittable, gap 18)
//! ├── title           centered
//! ├── grid table      centered, edges from border synthesis
//! └── clue lists      MultiColumn: "Across" then "Down"
//! ```
//!
//! [`RenderMode::Puzzle`] and [`RenderMode::Solution`] differ only in which
//! letters are printed. The edge map is the same in both.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::layout::{ConstraintOverride, EdgeSlot, HAlign, Table, VAlign};
use crate::model::{Arrangement, Composite, ContentNode, Edges, PageConfig};
use crate::puzzle::border::synthesize_edges;
use crate::puzzle::{Cell, Direction, Grid, GridView};
use crate::style::{Color, StyleOverride};

/// Gap between the title, the grid, and the clues.
const SECTION_GAP: f64 = 18.0;
const OUTER_BORDER: f64 = 1.5;
const INNER_BORDER: f64 = 0.75;
/// Font sizes relative to the cell size.
const NUMBER_SCALE: f64 = 0.28;
const LETTER_SCALE: f64 = 0.55;
const COLUMN_GAP: f64 = 18.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Numbers and filler only; answers are left blank.
    #[default]
    Puzzle,
    /// Answers filled in.
    Solution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub mode: RenderMode,
    /// Side of one grid cell in points, before fitting to the page.
    pub cell_size: f64,
    pub clue_columns: usize,
    pub show_clues: bool,
    pub title_style: StyleOverride,
    pub clue_style: StyleOverride,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::Puzzle,
            cell_size: 24.0,
            clue_columns: 2,
            show_clues: true,
            title_style: StyleOverride::default().size(20.0).bold(),
            clue_style: StyleOverride::default().size(10.0),
        }
    }
}

/// The whole document stream for one puzzle.
pub fn puzzle_document(
    title: Option<&str>,
    grid: &Grid,
    options: &RenderOptions,
    page: &PageConfig,
) -> Result<ContentNode, LayoutError> {
    let mut document = Composite::builder(Arrangement::Vertical { gap: SECTION_GAP });

    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        document.push(centered(ContentNode::paragraph(
            title,
            options.title_style.clone(),
        )));
    }

    let cell_size = fit_cell_size(grid, options.cell_size, page);
    document.push(centered(grid_table(grid, options.mode, cell_size)?));

    if options.show_clues && !grid.placements().is_empty() {
        document.push(clue_lists(grid, options));
    }
    Ok(document.build())
}

fn centered(node: ContentNode) -> ContentNode {
    Composite::builder(Arrangement::Vertical { gap: 0.0 })
        .child(node)
        .constraint(ConstraintOverride::default().halign(HAlign::Center))
        .unsplittable()
        .build()
}

/// Largest cell size up to `wanted` that keeps the grid inside the page's
/// content area.
fn fit_cell_size(grid: &Grid, wanted: f64, page: &PageConfig) -> f64 {
    let (content_w, content_h) = page.content_size();
    let per_axis = |space: f64, count: usize| {
        if count == 0 {
            wanted
        } else {
            (space - OUTER_BORDER) / count as f64 - OUTER_BORDER
        }
    };
    wanted
        .min(per_axis(content_w, grid.width()))
        .min(per_axis(content_h, grid.height()))
        .max(1.0)
}

/// The grid as a table of fixed-size cells with synthesized edges.
pub fn grid_table(grid: &Grid, mode: RenderMode, cell_size: f64) -> Result<ContentNode, LayoutError> {
    let numbering = grid.numbering();
    Table::builder(grid.height(), grid.width())
        .cells_from(|row, col| {
            let mut cell = Composite::builder(Arrangement::Stack)
                .constraint(ConstraintOverride::default().fill().align(HAlign::Left, VAlign::Top))
                .child(ContentNode::spacer(cell_size, cell_size));

            if let Some(number) = numbering.at(row, col) {
                cell.push(
                    Composite::builder(Arrangement::Vertical { gap: 0.0 })
                        .padding(Edges {
                            top: cell_size * 0.04,
                            left: cell_size * 0.06,
                            ..Edges::default()
                        })
                        .child(ContentNode::styled_text(
                            &number.to_string(),
                            StyleOverride::default().size(cell_size * NUMBER_SCALE),
                        ))
                        .build(),
                );
            }

            let letter = grid.cell(row, col).and_then(|c| Some((shown_letter(c, mode)?, c)));
            if let Some((text, source)) = letter {
                cell.push(
                    Composite::builder(Arrangement::Vertical { gap: 0.0 })
                        .constraint(
                            ConstraintOverride::default()
                                .fill()
                                .align(HAlign::Center, VAlign::Center),
                        )
                        .child(text.with_style(letter_style(cell_size, source)))
                        .build(),
                );
            }
            cell.build()
        })
        .border_thickness(|slot: EdgeSlot| if slot.outer { OUTER_BORDER } else { INNER_BORDER })
        .edges(synthesize_edges(grid))
        .constraint(ConstraintOverride::default().tight(true, true))
        .build()
}

fn shown_letter(cell: &Cell, mode: RenderMode) -> Option<ContentNode> {
    let letter = cell.letter?;
    (!cell.puzzle || mode == RenderMode::Solution).then(|| ContentNode::text(&letter.to_string()))
}

/// Filler letters are grey so they read as decoration.
fn letter_style(cell_size: f64, cell: &Cell) -> StyleOverride {
    let style = StyleOverride::default().size(cell_size * LETTER_SCALE);
    if cell.puzzle {
        style.bold()
    } else {
        style.color(Color::gray(0.55))
    }
}

/// "Across" and "Down" clue lists poured through the clue columns.
pub fn clue_lists(grid: &Grid, options: &RenderOptions) -> ContentNode {
    let numbering = grid.numbering();
    let mut lists = Composite::builder(Arrangement::MultiColumn {
        columns: options.clue_columns.max(1),
        gap: COLUMN_GAP,
    })
    .style(options.clue_style.clone());

    for direction in [Direction::Across, Direction::Down] {
        let clues = numbering.clues(grid, direction);
        if clues.is_empty() {
            continue;
        }
        if !lists.is_empty() {
            lists.push(ContentNode::spacer(0.0, 6.0));
        }
        lists.push(ContentNode::styled_text(
            direction.label(),
            StyleOverride::default().bold(),
        ));
        for (number, placement) in clues {
            let text = match &placement.clue {
                Some(clue) => format!("{number}. {clue} ({})", placement.len()),
                None => format!("{number}. ({})", placement.len()),
            };
            lists.push(ContentNode::paragraph(&text, StyleOverride::default()));
        }
    }
    lists.build()
}
