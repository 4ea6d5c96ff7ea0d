//! In-memory text buffer implementing the document surface.
//!
//! Stands in for the host editor in the CLI and in tests: line/column
//! addressed, with the host's clamping semantics — a column past the end
//! of a line clamps to the line end, a line past the end of the document
//! clamps to the document end.

use loreweave_core::{DocumentSurface, Position};

/// A line/column addressed text document with a cursor and an optional
/// selection (tracked as character offsets).
#[derive(Debug, Clone)]
pub struct TextBuffer {
    content: String,
    cursor: Position,
    selection: Option<(usize, usize)>,
}

impl TextBuffer {
    /// Create a buffer with the cursor at the end of the content.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut buffer = Self {
            content,
            cursor: Position::new(0, 0),
            selection: None,
        };
        buffer.cursor = buffer.end_position();
        buffer
    }

    /// Move the cursor.
    pub fn with_cursor(mut self, cursor: Position) -> Self {
        self.cursor = cursor;
        self
    }

    /// Select the character range `start..end`, moving the cursor to the
    /// end of the selection.
    pub fn select_chars(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let start = start.min(len);
        let end = end.clamp(start, len);
        self.selection = Some((start, end));
        self.cursor = self.position_of(end);
    }

    /// The position just past the last character.
    pub fn end_position(&self) -> Position {
        self.position_of(self.char_len())
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Character offset of a position, clamping line and column.
    fn offset_of(&self, position: Position) -> usize {
        let mut offset = 0usize;
        for (index, line) in self.content.split('\n').enumerate() {
            let line_chars = line.chars().count();
            if index == position.line {
                return offset + position.column.min(line_chars);
            }
            offset += line_chars + 1; // +1 for the newline
        }
        self.char_len()
    }

    /// Position of a character offset.
    fn position_of(&self, offset: usize) -> Position {
        let mut line = 0usize;
        let mut column = 0usize;
        for ch in self.content.chars().take(offset) {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Position::new(line, column)
    }

    /// Byte index of a character offset.
    fn byte_of(&self, char_offset: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_offset)
            .map(|(byte, _)| byte)
            .unwrap_or(self.content.len())
    }
}

impl DocumentSurface for TextBuffer {
    fn content(&self) -> String {
        self.content.clone()
    }

    fn selection(&self) -> Option<String> {
        self.selection.map(|(start, end)| {
            self.content
                .chars()
                .skip(start)
                .take(end - start)
                .collect()
        })
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn insert_at(&mut self, position: Position, text: &str) {
        let byte = self.byte_of(self.offset_of(position));
        self.content.insert_str(byte, text);
    }

    fn replace_selection(&mut self, text: &str) {
        match self.selection.take() {
            Some((start, end)) => {
                let range = self.byte_of(start)..self.byte_of(end);
                self.content.replace_range(range, text);
                self.cursor = self.position_of(start + text.chars().count());
            }
            None => {
                let offset = self.offset_of(self.cursor);
                let byte = self.byte_of(offset);
                self.content.insert_str(byte, text);
                self.cursor = self.position_of(offset + text.chars().count());
            }
        }
    }

    fn set_content(&mut self, text: &str) {
        self.content = text.to_string();
        self.selection = None;
        self.cursor = self.end_position();
    }
}
