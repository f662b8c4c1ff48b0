//! Line lookups over document text.
//!
//! Regions are byte offsets; LSP positions count UTF-16 code units per line.
//! `LineIndex` translates between the two.

use std::ops::Range;

use tower_lsp::lsp_types::{self, Position};

use crate::whitespace::Region;

/// Document text together with the byte offset of every line start.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    source: String,
}

impl LineIndex {
    pub fn new(source: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            line_starts,
            source,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn into_source(self) -> String {
        self.source
    }

    /// Zero-based line containing the byte offset. A newline belongs to the
    /// line it ends.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Byte range of a line, excluding its newline. Lines past the end map
    /// to the last line.
    pub fn line_range(&self, line: usize) -> Range<usize> {
        let line = line.min(self.line_starts.len() - 1);
        let start = self.line_starts[line];
        let end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.source.len());
        start..end
    }

    /// LSP position of a byte offset. Offsets inside a multi-byte character
    /// resolve to the start of that character.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let line = self.line_of(offset);
        let line_start = self.line_starts[line];
        let column: usize = self.source[line_start..]
            .char_indices()
            .take_while(|(i, c)| line_start + i < offset && *c != '\n')
            .map(|(_, c)| c.len_utf16())
            .sum();

        Position::new(line as u32, column as u32)
    }

    /// Byte offset of an LSP position, or `None` past the last line.
    /// Columns past the end of a line clamp to the line end.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return None;
        }

        let range = self.line_range(line);
        let mut column = 0u32;
        for (i, c) in self.source[range.clone()].char_indices() {
            if column >= position.character {
                return Some(range.start + i);
            }
            column += c.len_utf16() as u32;
        }

        Some(range.end)
    }

    pub fn region_to_range(&self, region: Region) -> lsp_types::Range {
        lsp_types::Range::new(
            self.offset_to_position(region.start),
            self.offset_to_position(region.end),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_of_trailing_run() {
        let idx = LineIndex::new("let x = 1;  \nok\n".to_string());
        assert_eq!(idx.offset_to_position(10), Position::new(0, 10));
        assert_eq!(idx.offset_to_position(12), Position::new(0, 12));
        assert_eq!(idx.offset_to_position(13), Position::new(1, 0));
        assert_eq!(idx.offset_to_position(16), Position::new(2, 0));
    }

    #[test]
    fn offsets_of_positions() {
        let idx = LineIndex::new("a  b\ncd".to_string());
        assert_eq!(idx.position_to_offset(Position::new(0, 1)), Some(1));
        assert_eq!(idx.position_to_offset(Position::new(1, 0)), Some(5));
        assert_eq!(idx.position_to_offset(Position::new(1, 2)), Some(7));
        assert_eq!(idx.position_to_offset(Position::new(2, 0)), None);
    }

    #[test]
    fn long_columns_clamp_to_line_end() {
        let idx = LineIndex::new("ab\ncd".to_string());
        assert_eq!(idx.position_to_offset(Position::new(0, 40)), Some(2));
    }

    #[test]
    fn columns_count_utf16_units() {
        // The emoji is 4 bytes and 2 UTF-16 units.
        let idx = LineIndex::new("x\u{1F600}  y".to_string());
        assert_eq!(idx.offset_to_position(5), Position::new(0, 3));
        assert_eq!(idx.offset_to_position(7), Position::new(0, 5));
        assert_eq!(idx.position_to_offset(Position::new(0, 3)), Some(5));
    }

    #[test]
    fn line_ranges_exclude_newline() {
        let idx = LineIndex::new("ab\n\ncd\n".to_string());
        assert_eq!(idx.line_range(0), 0..2);
        assert_eq!(idx.line_range(1), 3..3);
        assert_eq!(idx.line_range(2), 4..6);
        assert_eq!(idx.line_range(3), 7..7);
        assert_eq!(idx.line_range(9), 7..7);
    }

    #[test]
    fn line_of_offsets() {
        let idx = LineIndex::new("ab\ncd".to_string());
        assert_eq!(idx.line_of(0), 0);
        assert_eq!(idx.line_of(2), 0);
        assert_eq!(idx.line_of(3), 1);
        assert_eq!(idx.line_of(5), 1);
    }

    #[test]
    fn region_ranges() {
        let idx = LineIndex::new("a\nb  \n".to_string());
        let range = idx.region_to_range(Region::new(3, 5));
        assert_eq!(range.start, Position::new(1, 1));
        assert_eq!(range.end, Position::new(1, 3));
    }
}
