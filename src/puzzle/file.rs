//! The JSON puzzle file: grid size, word placements, filler letters, and
//! how to lay the puzzle out.
//!
//! ```json
//! {
//!   "title": "Tiny",
//!   "width": 3, "height": 1,
//!   "words": [{ "text": "cat", "row": 0, "col": 0, "direction": "across" }]
//! }
//! ```
//!
//! Every field except `width`, `height` and `words` is optional.

use serde::{Deserialize, Serialize};

use super::{Filler, Grid, WordPlacement};
use crate::error::{PuzzleError, QuireError};
use crate::model::{Metadata, PageConfig};
use crate::render::RenderOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleFile {
    #[serde(default)]
    pub title: Option<String>,
    pub width: usize,
    pub height: usize,
    pub words: Vec<WordPlacement>,
    #[serde(default)]
    pub filler: Vec<Filler>,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub options: RenderOptions,
    #[serde(default)]
    pub metadata: Metadata,
}

impl PuzzleFile {
    pub fn from_json(json: &str) -> Result<Self, QuireError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn grid(&self) -> Result<Grid, PuzzleError> {
        Grid::from_placements(self.width, self.height, &self.words, &self.filler)
    }

    /// Document metadata, with the puzzle title standing in for a missing
    /// metadata title.
    pub fn metadata(&self) -> Metadata {
        Metadata {
            title: self.metadata.title.clone().or_else(|| self.title.clone()),
            ..self.metadata.clone()
        }
    }
}

/// A small complete puzzle, printed by `quire --example`.
pub fn example_json() -> &'static str {
    r#"{
  "title": "Workshop",
  "width": 7,
  "height": 5,
  "words": [
    { "text": "crate", "row": 0, "col": 0, "direction": "across", "clue": "Wooden shipping box" },
    { "text": "cat", "row": 0, "col": 0, "direction": "down", "clue": "Mouser" },
    { "text": "axe", "row": 0, "col": 2, "direction": "down", "clue": "Splitting tool" },
    { "text": "toe", "row": 2, "col": 0, "direction": "across", "clue": "Foot digit" },
    { "text": "earn", "row": 0, "col": 4, "direction": "down", "clue": "Make money" }
  ],
  "filler": [
    { "row": 1, "col": 6, "letter": "z" }
  ],
  "page": { "size": "Letter", "footer": "Page {page} of {pages}" },
  "options": { "cellSize": 28 },
  "metadata": { "author": "Quire" }
}"#
}
