//! Structured error types for the Quire engine.
//!
//! [`LayoutError`] covers failures of the fill/draw protocol and pagination.
//! Two of its kinds (overflow and page-limit truncation) are usually reported
//! as warnings on an otherwise-successful [`Document`](crate::layout::Document)
//! rather than returned as `Err`. [`PuzzleError`] covers bad grid input, and
//! [`QuireError`] is what the public entry points return.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// An unsplittable node is larger than the space it was given.
    #[error(
        "content of {width:.2}x{height:.2}pt does not fit in {max_width:.2}x{max_height:.2}pt"
    )]
    OverflowUnsplittable {
        width: f64,
        height: f64,
        max_width: f64,
        max_height: f64,
    },

    /// `draw` was handed a placement that was not produced for this node.
    #[error("placement does not match content: {0}")]
    StreamMismatch(String),

    /// Pagination stopped at the configured page cap with content left over.
    #[error("page limit of {limit} reached; remaining content was truncated")]
    PageLimitExceeded { limit: usize },

    /// A table's declared shape disagrees with the cells supplied for it.
    #[error("table declared as {rows}x{columns} but {cells} cells were supplied")]
    InvalidTableShape {
        rows: usize,
        columns: usize,
        cells: usize,
    },
}

impl LayoutError {
    pub(crate) fn mismatch(detail: impl Into<String>) -> Self {
        LayoutError::StreamMismatch(detail.into())
    }

    /// Whether this error is a recoverable condition that pagination reports
    /// as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            LayoutError::OverflowUnsplittable { .. } | LayoutError::PageLimitExceeded { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("word {word:?} at ({row}, {col}) runs outside the {width}x{height} grid")]
    OutOfBounds {
        word: String,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("cell ({row}, {col}) holds {existing:?} but {word:?} needs {wanted:?}")]
    LetterConflict {
        row: usize,
        col: usize,
        existing: char,
        wanted: char,
        word: String,
    },

    #[error("word placement #{index} has no letters")]
    EmptyWord { index: usize },

    #[error("a {width}x{height} grid is too large")]
    TooLarge { width: usize, height: usize },

    /// Two words running the same direction share a cell.
    #[error("{first:?} and {second:?} overlap at ({row}, {col})")]
    Overlap {
        row: usize,
        col: usize,
        first: String,
        second: String,
    },
}

/// The unified error type returned by the public Quire API.
#[derive(Debug, Error)]
pub enum QuireError {
    /// JSON input failed to parse as a puzzle file.
    #[error("failed to parse puzzle: {source}{}", hint_suffix(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },

    #[error("invalid puzzle: {0}")]
    Puzzle(#[from] PuzzleError),

    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for QuireError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the puzzle schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        QuireError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_hint() {
        let err: QuireError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.contains("Hint"), "got {msg}");
        assert!(msg.contains("trailing commas"));
    }

    #[test]
    fn warnings_are_classified() {
        assert!(LayoutError::PageLimitExceeded { limit: 3 }.is_warning());
        assert!(!LayoutError::mismatch("x").is_warning());
        assert!(!LayoutError::InvalidTableShape {
            rows: 1,
            columns: 1,
            cells: 2
        }
        .is_warning());
    }
}
