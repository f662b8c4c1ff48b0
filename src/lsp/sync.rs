//! Mirroring client edits into a buffer.

use tower_lsp::lsp_types::TextDocumentContentChangeEvent;

use crate::document::Buffer;
use crate::whitespace::{Region, TextView};

/// Apply incremental (or full) content changes in order.
///
/// Afterwards the buffer's selections cover the text each change inserted,
/// standing in for the cursors an editor would report: these are the lines
/// an incremental scan looks at.
pub fn apply_content_changes(buffer: &mut Buffer, changes: Vec<TextDocumentContentChangeEvent>) {
    buffer.set_selections(Vec::new());

    for change in changes {
        let region = match change.range {
            Some(range) => {
                let index = buffer.line_index();
                let start = index.position_to_offset(range.start).unwrap_or(buffer.size());
                let end = index.position_to_offset(range.end).unwrap_or(buffer.size());
                Region::new(start, end.max(start))
            }
            None => Region::new(0, buffer.size()),
        };

        buffer.apply_change(region, &change.text);

        // Earlier selections were shifted by apply_change.
        let mut selections = buffer.selections();
        selections.push(Region::new(region.start, region.start + change.text.len()));
        buffer.set_selections(selections);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whitespace::IssueKind;
    use tower_lsp::lsp_types::{Position, Range};

    fn change(start: (u32, u32), end: (u32, u32), text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: Some(Range::new(
                Position::new(start.0, start.1),
                Position::new(end.0, end.1),
            )),
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn incremental_change_sets_selection() {
        let mut buffer = Buffer::new("one\ntwo\n");
        apply_content_changes(&mut buffer, vec![change((1, 3), (1, 3), "  ")]);
        assert_eq!(buffer.text(), "one\ntwo  \n");
        assert_eq!(buffer.selections(), vec![Region::new(7, 9)]);
    }

    #[test]
    fn later_changes_shift_earlier_selections() {
        let mut buffer = Buffer::new("one\ntwo\n");
        apply_content_changes(
            &mut buffer,
            vec![change((1, 0), (1, 0), "x"), change((0, 0), (0, 0), "yy")],
        );
        assert_eq!(buffer.text(), "yyone\nxtwo\n");
        assert_eq!(
            buffer.selections(),
            vec![Region::new(6, 7), Region::new(0, 2)]
        );
    }

    #[test]
    fn full_change_replaces_everything() {
        let mut buffer = Buffer::new("old  \n");
        buffer.add_regions(IssueKind::Trailing, vec![Region::new(3, 5)]);
        apply_content_changes(
            &mut buffer,
            vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "new\n".to_string(),
            }],
        );
        assert_eq!(buffer.text(), "new\n");
        assert!(buffer.get_regions(IssueKind::Trailing).is_empty());
        assert_eq!(buffer.selections(), vec![Region::new(0, 4)]);
    }
}
