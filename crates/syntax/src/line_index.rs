//! Byte offset <-> editor position translation.

use graphql_types::{OffsetRange, Position, Range};
use std::sync::Arc;

/// Line index over a source text.
///
/// Byte offsets are the canonical internal coordinates. Editor positions
/// count columns in UTF-16 code units; this is the only place where the two
/// meet. Out-of-bounds positions are clamped, never rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
    text: Arc<str>,
}

impl LineIndex {
    /// Create a new line index from source text
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];

        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }

        Self {
            line_starts,
            text: Arc::from(text),
        }
    }

    /// Convert a byte offset to a line/byte-column pair (0-based)
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i.saturating_sub(1));

        let col = offset - self.line_starts[line];
        (line, col)
    }

    /// Get the byte offset of the start of a line
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Get the number of lines
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of a line's content, excluding its terminator (`\n` or `\r\n`).
    fn line_content(&self, line: usize) -> (usize, usize) {
        let start = self.line_starts[line];
        let mut end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        (start, end)
    }

    /// Convert a byte offset to an editor position.
    ///
    /// Offsets past the end clamp to the end of the text; offsets inside a
    /// multi-byte character snap back to the character start.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let (line, _) = self.line_col(offset);
        let (start, end) = self.line_content(line);
        let column_end = offset.min(end);
        let character: usize = self.text[start..column_end]
            .chars()
            .map(char::len_utf16)
            .sum();
        Position::new(line as u32, character as u32)
    }

    /// Convert an editor position to a byte offset.
    ///
    /// A line past the last line maps to the end of the text, a column past
    /// the end of its line maps to the end of that line, and a column that
    /// splits a surrogate pair maps to the start of that character.
    #[must_use]
    pub fn offset(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return self.text.len();
        }
        let (start, end) = self.line_content(line);
        let target = position.character as usize;
        let mut units = 0;
        for (i, c) in self.text[start..end].char_indices() {
            let next = units + c.len_utf16();
            if next > target {
                return start + i;
            }
            units = next;
        }
        end
    }

    /// Clamp a position into the document bounds.
    #[must_use]
    pub fn clamp(&self, position: Position) -> Position {
        self.position(self.offset(position))
    }

    /// Convert a byte range to an editor range.
    #[must_use]
    pub fn range(&self, range: OffsetRange) -> Range {
        Range::new(self.position(range.start), self.position(range.end))
    }

    /// Convert an editor range to a byte range, normalising reversed ranges.
    #[must_use]
    pub fn offset_range(&self, range: Range) -> OffsetRange {
        let range = range.normalized();
        OffsetRange::new(self.offset(range.start), self.offset(range.end))
    }

    /// Position just past the last character.
    #[must_use]
    pub fn end_position(&self) -> Position {
        self.position(self.text.len())
    }

    /// The indexed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
