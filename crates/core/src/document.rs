//! Document seam — the host editor surface the engine writes through.
//!
//! The host owns the live document; the core only addresses it through
//! this trait, and never holds a reference beyond a single operation.

use serde::{Deserialize, Serialize};

/// A position in the live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The insertion point after `chars` characters have been appended
    /// from this position.
    ///
    /// Column-only advance: the host editor addresses streamed insertions
    /// relative to the start position, so the line never changes and the
    /// column grows monotonically with the inserted length.
    pub fn advanced_by(&self, chars: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + chars,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// The editable document surface exposed by the host.
///
/// Only the stream reconciler and the dispatcher's result routing mutate
/// the document, and only through these operations.
pub trait DocumentSurface: Send {
    /// The full document text.
    fn content(&self) -> String;

    /// The current text selection, if any.
    fn selection(&self) -> Option<String>;

    /// The current cursor position.
    fn cursor(&self) -> Position;

    /// Insert `text` at `position`, leaving surrounding content intact.
    fn insert_at(&mut self, position: Position, text: &str);

    /// Replace the current selection with `text` and collapse the cursor
    /// to the end of the replacement.
    fn replace_selection(&mut self, text: &str);

    /// Replace the entire document content.
    fn set_content(&mut self, text: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_column_only() {
        let start = Position::new(3, 10);
        let next = start.advanced_by(5);
        assert_eq!(next, Position::new(3, 15));
    }

    #[test]
    fn advance_by_zero_is_identity() {
        let start = Position::new(0, 7);
        assert_eq!(start.advanced_by(0), start);
    }

    #[test]
    fn advance_is_monotonic() {
        let start = Position::new(1, 0);
        let mut previous = start;
        for total in [3usize, 8, 8, 20] {
            let next = start.advanced_by(total);
            assert!(next.column >= previous.column);
            previous = next;
        }
    }
}
